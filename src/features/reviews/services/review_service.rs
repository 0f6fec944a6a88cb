use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reviews::dtos::CreateReviewDto;
use crate::features::reviews::models::Review;
use crate::shared::types::PaginationQuery;

/// Service for shop reviews
pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reviews of a shop, newest first, with the total count
    pub async fn list_reviews(
        &self,
        shop_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<Review>, i64)> {
        self.shop_owner(shop_id).await?;

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, shop_id, author_id, rating, comment, tail_number, created_at
            FROM reviews
            WHERE shop_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(shop_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch reviews for shop {}: {:?}", shop_id, e);
            AppError::Database(e)
        })?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE shop_id = $1")
            .bind(shop_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reviews for shop {}: {:?}", shop_id, e);
                AppError::Database(e)
            })?;

        Ok((reviews, total))
    }

    /// Add a review; owners cannot review their own shop
    pub async fn create_review(
        &self,
        shop_id: Uuid,
        author_id: &str,
        dto: CreateReviewDto,
    ) -> Result<Review> {
        let owner_id = self.shop_owner(shop_id).await?;
        if owner_id == author_id {
            return Err(AppError::Forbidden(
                "You cannot review your own shop".to_string(),
            ));
        }

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (shop_id, author_id, rating, comment, tail_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, shop_id, author_id, rating, comment, tail_number, created_at
            "#,
        )
        .bind(shop_id)
        .bind(author_id)
        .bind(dto.rating)
        .bind(&dto.comment)
        .bind(&dto.tail_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create review for shop {}: {:?}", shop_id, e);
            AppError::Database(e)
        })?;

        info!(
            "Review created: id={}, shop={}, rating={}",
            review.id, shop_id, review.rating
        );
        Ok(review)
    }

    async fn shop_owner(&self, shop_id: Uuid) -> Result<String> {
        sqlx::query_scalar::<_, String>("SELECT owner_id FROM shops WHERE id = $1")
            .bind(shop_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch shop {}: {:?}", shop_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Shop with id '{}' not found", shop_id)))
    }
}
