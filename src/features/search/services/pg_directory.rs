use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::directory::{CandidateQuery, ReviewRating, ShopDirectory};
use crate::features::search::error::SearchError;
use crate::features::shops::models::{Shop, SHOP_COLUMNS};

/// Postgres-backed directory: bounding-box prefilter plus array overlap on tags
pub struct PgShopDirectory {
    pool: PgPool,
}

impl PgShopDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopDirectory for PgShopDirectory {
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Shop>, SearchError> {
        let bbox = query.bounding_box();
        let lat_range = bbox.map(|b| (b.min_lat, b.max_lat));
        let lng_range = bbox.and_then(|b| b.lng_range);

        let sql = format!(
            r#"
            SELECT {SHOP_COLUMNS}
            FROM shops
            WHERE ($1::float8 IS NULL OR latitude BETWEEN $1::float8 AND $2::float8)
              AND ($3::float8 IS NULL OR longitude BETWEEN $3::float8 AND $4::float8)
              AND (cardinality($5::text[]) = 0 OR specializations_aircraft && $5::text[])
              AND (cardinality($6::text[]) = 0 OR specializations_services && $6::text[])
              AND ($7::text IS NULL OR strpos(upper(airport_code), upper($7::text)) > 0)
            "#
        );

        let shops = sqlx::query_as::<_, Shop>(&sql)
            .bind(lat_range.map(|r| r.0))
            .bind(lat_range.map(|r| r.1))
            .bind(lng_range.map(|r| r.0))
            .bind(lng_range.map(|r| r.1))
            .bind(query.aircraft_tags.as_slice())
            .bind(query.service_tags.as_slice())
            .bind(query.airport_contains.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query candidate shops: {:?}", e);
                SearchError::from(e)
            })?;

        tracing::debug!("Shop directory returned {} candidates", shops.len());
        Ok(shops)
    }

    async fn review_ratings(&self, shop_ids: &[Uuid]) -> Result<Vec<ReviewRating>, SearchError> {
        sqlx::query_as::<_, ReviewRating>(
            r#"
            SELECT shop_id, rating
            FROM reviews
            WHERE shop_id = ANY($1)
            "#,
        )
        .bind(shop_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch review ratings: {:?}", e);
            SearchError::from(e)
        })
    }
}
