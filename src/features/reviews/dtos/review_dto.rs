use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reviews::models::Review;
use crate::shared::validation::non_blank;

/// Request DTO for reviewing a shop
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: i32,

    #[validate(length(max = 2000, message = "Comment must not exceed 2000 characters"))]
    pub comment: Option<String>,

    /// Registration of the aircraft that was serviced
    #[validate(
        length(max = 10, message = "Tail number must not exceed 10 characters"),
        regex(
            path = "*crate::shared::validation::TAIL_NUMBER_REGEX",
            message = "Tail number may only contain letters, digits and one hyphen"
        )
    )]
    #[schema(example = "N172SP")]
    pub tail_number: Option<String>,
}

impl CreateReviewDto {
    pub fn normalized(self) -> Self {
        Self {
            rating: self.rating,
            comment: non_blank(self.comment),
            tail_number: non_blank(self.tail_number).map(|t| t.to_uppercase()),
        }
    }
}

/// Response DTO for review data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponseDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            shop_id: review.shop_id,
            rating: review.rating,
            comment: review.comment,
            tail_number: review.tail_number,
            created_at: review.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(json: serde_json::Value) -> CreateReviewDto {
        serde_json::from_value::<CreateReviewDto>(json).unwrap().normalized()
    }

    #[test]
    fn test_rating_bounds() {
        assert!(review(serde_json::json!({ "rating": 1 })).validate().is_ok());
        assert!(review(serde_json::json!({ "rating": 5 })).validate().is_ok());
        assert!(review(serde_json::json!({ "rating": 0 })).validate().is_err());
        assert!(review(serde_json::json!({ "rating": 6 })).validate().is_err());
    }

    #[test]
    fn test_comment_length_limit() {
        let long = "x".repeat(2001);
        assert!(review(serde_json::json!({ "rating": 4, "comment": long }))
            .validate()
            .is_err());
        let max = "x".repeat(2000);
        assert!(review(serde_json::json!({ "rating": 4, "comment": max }))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_tail_number_is_normalized() {
        let dto = review(serde_json::json!({ "rating": 4, "tailNumber": " n172sp ", "comment": " " }));
        assert_eq!(dto.tail_number.as_deref(), Some("N172SP"));
        assert!(dto.comment.is_none());
        assert!(dto.validate().is_ok());

        let dto = review(serde_json::json!({ "rating": 4, "tailNumber": "N 172" }));
        assert!(dto.validate().is_err());
    }
}
