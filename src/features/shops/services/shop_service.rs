use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::airports::AirportService;
use crate::features::search::models::GeoPoint;
use crate::features::shops::dtos::ShopRequestDto;
use crate::features::shops::models::{Shop, ShopDetail, SHOP_COLUMNS};
use crate::modules::storage::ObjectStore;
use crate::shared::constants::{ALLOWED_PHOTO_TYPES, MAX_PHOTO_SIZE, SHOP_PHOTOS_FOLDER};

/// A photo read from a multipart request
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// File extension for an accepted photo content type
pub fn photo_extension(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    ALLOWED_PHOTO_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
}

/// Service for shop profiles and their photos
pub struct ShopService {
    pool: PgPool,
    storage: Arc<dyn ObjectStore>,
    airports: Arc<AirportService>,
}

impl ShopService {
    pub fn new(
        pool: PgPool,
        storage: Arc<dyn ObjectStore>,
        airports: Arc<AirportService>,
    ) -> Self {
        Self {
            pool,
            storage,
            airports,
        }
    }

    /// Get a shop with its rating summary
    pub async fn get_shop(&self, id: Uuid) -> Result<ShopDetail> {
        let shop = self.find_shop(id).await?;
        self.with_rating(shop).await
    }

    /// Get the shop owned by `owner_id`
    pub async fn get_shop_by_owner(&self, owner_id: &str) -> Result<ShopDetail> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE owner_id = $1");
        let shop = sqlx::query_as::<_, Shop>(&sql)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch shop for owner {}: {:?}", owner_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("You have not created a shop yet".to_string()))?;

        self.with_rating(shop).await
    }

    /// Create the caller's shop; a member can own only one
    pub async fn create_shop(&self, owner_id: &str, dto: ShopRequestDto) -> Result<Shop> {
        let location = resolve_location(&dto, &self.airports)?;

        let sql = format!(
            r#"
            INSERT INTO shops (
                owner_id, name, airport_code, address, latitude, longitude,
                contact_person, phone, email, description,
                specializations_aircraft, specializations_services, faa_certifications
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {SHOP_COLUMNS}
            "#
        );

        let shop = sqlx::query_as::<_, Shop>(&sql)
            .bind(owner_id)
            .bind(&dto.name)
            .bind(&dto.airport_code)
            .bind(&dto.address)
            .bind(location.lat)
            .bind(location.lng)
            .bind(&dto.contact_person)
            .bind(&dto.phone)
            .bind(&dto.email)
            .bind(&dto.description)
            .bind(&dto.specializations_aircraft)
            .bind(&dto.specializations_services)
            .bind(&dto.faa_certifications)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::Conflict("You already have a shop".to_string())
                }
                e => {
                    tracing::error!("Failed to create shop for owner {}: {:?}", owner_id, e);
                    AppError::Database(e)
                }
            })?;

        info!("Shop created: id={}, owner={}", shop.id, owner_id);
        Ok(shop)
    }

    /// Replace the editable fields of a shop. Tier and verification stay as they are.
    pub async fn update_shop(&self, id: Uuid, user_id: &str, dto: ShopRequestDto) -> Result<Shop> {
        let existing = self.find_shop(id).await?;
        ensure_owner(&existing, user_id)?;
        let location = resolve_location(&dto, &self.airports)?;

        let sql = format!(
            r#"
            UPDATE shops SET
                name = $2, airport_code = $3, address = $4, latitude = $5, longitude = $6,
                contact_person = $7, phone = $8, email = $9, description = $10,
                specializations_aircraft = $11, specializations_services = $12,
                faa_certifications = $13, updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOP_COLUMNS}
            "#
        );

        let shop = sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.airport_code)
            .bind(&dto.address)
            .bind(location.lat)
            .bind(location.lng)
            .bind(&dto.contact_person)
            .bind(&dto.phone)
            .bind(&dto.email)
            .bind(&dto.description)
            .bind(&dto.specializations_aircraft)
            .bind(&dto.specializations_services)
            .bind(&dto.faa_certifications)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update shop {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        info!("Shop updated: id={}", shop.id);
        Ok(shop)
    }

    /// Delete a shop and its reviews, then its stored photos
    pub async fn delete_shop(&self, id: Uuid, user_id: &str) -> Result<()> {
        let shop = self.find_shop(id).await?;
        ensure_owner(&shop, user_id)?;

        sqlx::query("DELETE FROM shops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete shop {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        info!("Shop deleted: id={}, photos={}", id, shop.photos.len());
        discard_photos(self.storage.as_ref(), &shop.photos).await;
        Ok(())
    }

    /// Store photos and append their public URLs to the shop
    pub async fn add_photos(
        &self,
        id: Uuid,
        user_id: &str,
        photos: Vec<PhotoUpload>,
    ) -> Result<Shop> {
        let shop = self.find_shop(id).await?;
        ensure_owner(&shop, user_id)?;

        if photos.is_empty() {
            return Err(AppError::BadRequest("At least one photo is required".to_string()));
        }
        let mut checked = Vec::with_capacity(photos.len());
        for photo in photos {
            let extension = validate_photo(&photo)?;
            checked.push((photo, extension));
        }

        let count = checked.len();
        let sql = format!(
            r#"
            UPDATE shops SET photos = photos || $2::text[], updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOP_COLUMNS}
            "#
        );
        let pool = &self.pool;
        let shop = store_photos(
            self.storage.as_ref(),
            &shop.owner_id,
            checked,
            |urls| async move {
                sqlx::query_as::<_, Shop>(&sql)
                    .bind(id)
                    .bind(&urls)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to save photos for shop {}: {:?}", id, e);
                        AppError::Database(e)
                    })
            },
        )
        .await?;

        info!("Added {} photo(s) to shop {}", count, id);
        Ok(shop)
    }

    /// Unlink a photo from the shop, then delete it from storage
    pub async fn remove_photo(&self, id: Uuid, user_id: &str, url: &str) -> Result<Shop> {
        let shop = self.find_shop(id).await?;
        ensure_owner(&shop, user_id)?;

        if !shop.photos.iter().any(|p| p == url) {
            return Err(AppError::NotFound("Photo not found on this shop".to_string()));
        }

        let sql = format!(
            r#"
            UPDATE shops SET photos = array_remove(photos, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING {SHOP_COLUMNS}
            "#
        );
        let shop = sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .bind(url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove photo from shop {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        info!("Removed photo from shop {}", id);
        discard_photos(self.storage.as_ref(), &[url.to_string()]).await;
        Ok(shop)
    }

    async fn find_shop(&self, id: Uuid) -> Result<Shop> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1");
        sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch shop {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Shop with id '{}' not found", id)))
    }

    async fn with_rating(&self, shop: Shop) -> Result<ShopDetail> {
        let (average_rating, review_count) = sqlx::query_as::<_, (f64, i64)>(
            r#"
            SELECT COALESCE(AVG(rating)::float8, 0), COUNT(*)
            FROM reviews
            WHERE shop_id = $1
            "#,
        )
        .bind(shop.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch rating summary for shop {}: {:?}", shop.id, e);
            AppError::Database(e)
        })?;

        Ok(ShopDetail {
            shop,
            average_rating,
            review_count,
        })
    }
}

/// Upload every photo, then hand their URLs to `commit`. When an upload or
/// the commit fails, the objects stored so far are deleted again.
async fn store_photos<T, F, Fut>(
    storage: &dyn ObjectStore,
    owner_id: &str,
    photos: Vec<(PhotoUpload, &'static str)>,
    commit: F,
) -> Result<T>
where
    F: FnOnce(Vec<String>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut keys = Vec::with_capacity(photos.len());
    let mut urls = Vec::with_capacity(photos.len());
    for (photo, extension) in photos {
        let path = format!(
            "{}/{}/{}.{}",
            SHOP_PHOTOS_FOLDER,
            owner_id,
            Uuid::new_v4(),
            extension
        );
        let key = storage.public_key(&path);
        if let Err(e) = storage.upload(&key, photo.data, &photo.content_type).await {
            discard_keys(storage, &keys).await;
            return Err(e);
        }
        debug!("Shop photo stored: {}", key);
        urls.push(storage.public_url(&key));
        keys.push(key);
    }

    match commit(urls).await {
        Ok(value) => Ok(value),
        Err(e) => {
            discard_keys(storage, &keys).await;
            Err(e)
        }
    }
}

/// Delete stored photos behind `urls`. Photos hosted elsewhere are skipped
/// and storage failures are only logged.
async fn discard_photos(storage: &dyn ObjectStore, urls: &[String]) {
    let keys: Vec<String> = urls
        .iter()
        .filter_map(|url| {
            let key = storage.extract_key_from_url(url);
            if key.is_none() {
                debug!("Photo {} is not in our bucket, skipping storage delete", url);
            }
            key
        })
        .collect();
    discard_keys(storage, &keys).await;
}

async fn discard_keys(storage: &dyn ObjectStore, keys: &[String]) {
    for key in keys {
        if let Err(e) = storage.delete(key).await {
            warn!("Failed to delete stored photo '{}': {}", key, e);
        }
    }
}

fn ensure_owner(shop: &Shop, user_id: &str) -> Result<()> {
    if shop.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the shop owner can change this shop".to_string(),
        ))
    }
}

/// Explicit coordinates when both are given, otherwise the airport's
fn resolve_location(dto: &ShopRequestDto, airports: &AirportService) -> Result<GeoPoint> {
    if let (Some(lat), Some(lng)) = (dto.lat, dto.lng) {
        return Ok(GeoPoint::new(lat, lng));
    }

    airports
        .resolve(&dto.airport_code)
        .map(|airport| airport.location())
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown airport '{}'; provide lat and lng for this shop",
                dto.airport_code
            ))
        })
}

fn validate_photo(photo: &PhotoUpload) -> Result<&'static str> {
    if photo.data.is_empty() {
        return Err(AppError::BadRequest("Photo is empty".to_string()));
    }
    if photo.data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::BadRequest(format!(
            "Photo too large. Maximum size is {} MB",
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }
    photo_extension(&photo.content_type).ok_or_else(|| {
        AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            photo.content_type,
            ALLOWED_PHOTO_TYPES
                .iter()
                .map(|(mime, _)| *mime)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{shop_at, InMemoryObjectStore};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn jpegs(n: usize) -> Vec<(PhotoUpload, &'static str)> {
        (0..n)
            .map(|_| {
                (
                    PhotoUpload {
                        data: vec![0xFF, 0xD8, 0xFF],
                        content_type: "image/jpeg".to_string(),
                    },
                    "jpg",
                )
            })
            .collect()
    }

    fn request(lat: Option<f64>, lng: Option<f64>, airport_code: &str) -> ShopRequestDto {
        ShopRequestDto {
            name: "Hudson Aero".to_string(),
            airport_code: airport_code.to_string(),
            address: "1 Industrial Ave".to_string(),
            lat,
            lng,
            contact_person: None,
            phone: None,
            email: None,
            description: None,
            specializations_aircraft: Vec::new(),
            specializations_services: Vec::new(),
            faa_certifications: Vec::new(),
        }
    }

    #[test]
    fn test_location_prefers_explicit_coordinates() {
        let airports = AirportService::embedded().unwrap();
        let point = resolve_location(&request(Some(40.8), Some(-74.0), "KTEB"), &airports).unwrap();
        assert_eq!(point, GeoPoint::new(40.8, -74.0));
    }

    #[test]
    fn test_location_falls_back_to_airport() {
        let airports = AirportService::embedded().unwrap();
        let point = resolve_location(&request(Some(40.8), None, "kteb"), &airports).unwrap();
        assert_eq!(point, GeoPoint::new(40.8501, -74.0608));
    }

    #[test]
    fn test_unknown_airport_without_coordinates_is_rejected() {
        let airports = AirportService::embedded().unwrap();
        assert!(matches!(
            resolve_location(&request(None, None, "ZZZZ"), &airports),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_only_owner_passes() {
        let shop = shop_at("Hudson Aero", 40.8, -74.0);
        assert!(ensure_owner(&shop, &shop.owner_id).is_ok());
        assert!(matches!(
            ensure_owner(&shop, "someone-else"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_photo_extension() {
        assert_eq!(photo_extension("image/jpeg"), Some("jpg"));
        assert_eq!(photo_extension("IMAGE/PNG"), Some("png"));
        assert_eq!(photo_extension("image/webp; charset=binary"), Some("webp"));
        assert_eq!(photo_extension("application/pdf"), None);
    }

    #[test]
    fn test_validate_photo_limits() {
        let ok = PhotoUpload {
            data: vec![1, 2, 3],
            content_type: "image/gif".to_string(),
        };
        assert_eq!(validate_photo(&ok).unwrap(), "gif");

        let too_big = PhotoUpload {
            data: vec![0; MAX_PHOTO_SIZE + 1],
            content_type: "image/png".to_string(),
        };
        assert!(validate_photo(&too_big).is_err());

        let wrong_type = PhotoUpload {
            data: vec![1],
            content_type: "text/plain".to_string(),
        };
        assert!(validate_photo(&wrong_type).is_err());

        let empty = PhotoUpload {
            data: Vec::new(),
            content_type: "image/png".to_string(),
        };
        assert!(validate_photo(&empty).is_err());
    }

    #[tokio::test]
    async fn test_stored_photos_are_committed_under_owner_folder() {
        let storage = InMemoryObjectStore::new();
        let urls = store_photos(&storage, "owner-1", jpegs(2), |urls| async move { Ok(urls) })
            .await
            .unwrap();

        assert_eq!(urls.len(), 2);
        assert_eq!(storage.keys().len(), 2);
        for key in storage.keys() {
            assert!(key.starts_with("public/shop-photos/owner-1/"), "{}", key);
            assert!(key.ends_with(".jpg"));
        }
    }

    #[tokio::test]
    async fn test_failed_commit_removes_uploaded_photos() {
        let storage = InMemoryObjectStore::new();
        let result: Result<()> = store_photos(&storage, "owner-1", jpegs(3), |_| async {
            Err(AppError::Internal("database down".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert!(storage.keys().is_empty());
        assert_eq!(storage.delete_attempts(), 3);
    }

    #[tokio::test]
    async fn test_failed_upload_removes_earlier_photos_and_skips_commit() {
        let storage = InMemoryObjectStore::failing_upload_at(3);
        let committed = AtomicBool::new(false);
        let result = store_photos(&storage, "owner-1", jpegs(4), |urls| {
            committed.store(true, Ordering::SeqCst);
            async move { Ok(urls) }
        })
        .await;

        assert!(result.is_err());
        assert!(!committed.load(Ordering::SeqCst));
        assert!(storage.keys().is_empty());
        assert_eq!(storage.delete_attempts(), 2);
    }

    #[tokio::test]
    async fn test_discard_skips_foreign_urls() {
        let storage = InMemoryObjectStore::new();
        storage.insert("public/shop-photos/owner-1/a.jpg");
        storage.insert("public/shop-photos/owner-1/b.jpg");

        discard_photos(
            &storage,
            &[
                storage.public_url("public/shop-photos/owner-1/a.jpg"),
                "https://cdn.elsewhere.test/c.jpg".to_string(),
            ],
        )
        .await;

        assert_eq!(storage.keys(), vec!["public/shop-photos/owner-1/b.jpg"]);
        assert_eq!(storage.delete_attempts(), 1);
    }

    #[tokio::test]
    async fn test_discard_keeps_going_when_storage_fails() {
        let storage = InMemoryObjectStore::failing_deletes();
        let urls = vec![
            storage.public_url("public/shop-photos/owner-1/a.jpg"),
            storage.public_url("public/shop-photos/owner-1/b.jpg"),
        ];

        discard_photos(&storage, &urls).await;
        assert_eq!(storage.delete_attempts(), 2);
    }
}
