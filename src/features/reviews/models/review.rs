use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a shop review
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub author_id: String,
    /// 1 to 5, enforced by a table constraint
    pub rating: i32,
    pub comment: Option<String>,
    pub tail_number: Option<String>,
    pub created_at: DateTime<Utc>,
}
