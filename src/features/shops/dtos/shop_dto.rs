use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::shops::models::{Shop, ShopDetail, ShopTier};
use crate::shared::validation::{non_blank, normalize_tags};

/// Request DTO for creating or replacing a shop profile
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopRequestDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(regex(
        path = "*crate::shared::validation::AIRPORT_CODE_REGEX",
        message = "Airport code must be 3-4 letters or digits"
    ))]
    #[schema(example = "KTEB")]
    pub airport_code: String,

    #[validate(length(min = 1, max = 500, message = "Address must be 1-500 characters"))]
    pub address: String,

    /// Explicit position; when lat or lng is missing the airport position is used
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub lng: Option<f64>,

    #[validate(length(max = 200, message = "Contact person must not exceed 200 characters"))]
    pub contact_person: Option<String>,

    #[validate(length(max = 50, message = "Phone must not exceed 50 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[schema(example = json!(["Cessna", "Piper"]))]
    pub specializations_aircraft: Vec<String>,

    #[serde(default)]
    #[schema(example = json!(["Annual", "Avionics"]))]
    pub specializations_services: Vec<String>,

    #[serde(default)]
    #[schema(example = json!(["Part 145"]))]
    pub faa_certifications: Vec<String>,
}

impl ShopRequestDto {
    /// Trim text, turn blank optional fields into `None` and clean tag lists
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            airport_code: self.airport_code.trim().to_uppercase(),
            address: self.address.trim().to_string(),
            lat: self.lat,
            lng: self.lng,
            contact_person: non_blank(self.contact_person),
            phone: non_blank(self.phone),
            email: non_blank(self.email),
            description: non_blank(self.description),
            specializations_aircraft: normalize_tags(self.specializations_aircraft),
            specializations_services: normalize_tags(self.specializations_services),
            faa_certifications: normalize_tags(self.faa_certifications),
        }
    }
}

/// Response DTO for shop data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopResponseDto {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub airport_code: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub specializations_aircraft: Vec<String>,
    pub specializations_services: Vec<String>,
    pub faa_certifications: Vec<String>,
    pub tier: ShopTier,
    pub photos: Vec<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Shop> for ShopResponseDto {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.id,
            owner_id: shop.owner_id,
            name: shop.name,
            airport_code: shop.airport_code,
            address: shop.address,
            lat: shop.latitude,
            lng: shop.longitude,
            contact_person: shop.contact_person,
            phone: shop.phone,
            email: shop.email,
            description: shop.description,
            specializations_aircraft: shop.specializations_aircraft,
            specializations_services: shop.specializations_services,
            faa_certifications: shop.faa_certifications,
            tier: shop.tier,
            photos: shop.photos,
            is_verified: shop.is_verified,
            created_at: shop.created_at,
            updated_at: shop.updated_at,
        }
    }
}

/// Shop with its review summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopDetailDto {
    #[serde(flatten)]
    pub shop: ShopResponseDto,
    /// Mean review rating, 0 without reviews
    pub average_rating: f64,
    pub review_count: i64,
}

impl From<ShopDetail> for ShopDetailDto {
    fn from(detail: ShopDetail) -> Self {
        Self {
            shop: detail.shop.into(),
            average_rating: detail.average_rating,
            review_count: detail.review_count,
        }
    }
}

/// Upload photos request DTO for OpenAPI documentation.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotosDto {
    /// One or more image files (jpeg, png, gif, webp; 10MB each)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Request DTO for removing a photo
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeletePhotoDto {
    /// Public URL of the photo, as listed in `photos`
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> ShopRequestDto {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_normalized_cleans_tags_and_blank_fields() {
        let dto = request(serde_json::json!({
            "name": "  Hudson Aero ",
            "airportCode": "kteb",
            "address": "1 Industrial Ave",
            "email": "",
            "phone": "  ",
            "contactPerson": " Jane Pilot ",
            "specializationsAircraft": [" Cessna", "Cessna", "", "Piper "],
            "specializationsServices": ["Annual"]
        }))
        .normalized();

        assert_eq!(dto.name, "Hudson Aero");
        assert_eq!(dto.airport_code, "KTEB");
        assert!(dto.email.is_none());
        assert!(dto.phone.is_none());
        assert_eq!(dto.contact_person.as_deref(), Some("Jane Pilot"));
        assert_eq!(dto.specializations_aircraft, vec!["Cessna", "Piper"]);
        assert!(dto.faa_certifications.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_fields() {
        let dto = request(serde_json::json!({
            "name": "",
            "airportCode": "NOT-A-CODE",
            "address": "1 Industrial Ave",
            "lat": 123.0,
            "email": "not-an-email"
        }))
        .normalized();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("airport_code"));
        assert!(fields.contains_key("lat"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_detail_flattens_shop_fields() {
        let shop = crate::shared::test_helpers::shop_at("Hudson Aero", 40.8, -74.0);
        let dto: ShopDetailDto = ShopDetail {
            shop,
            average_rating: 4.5,
            review_count: 2,
        }
        .into();

        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["name"], "Hudson Aero");
        assert_eq!(json["lat"], 40.8);
        assert_eq!(json["averageRating"], 4.5);
        assert_eq!(json["tier"], "standard");
    }
}
