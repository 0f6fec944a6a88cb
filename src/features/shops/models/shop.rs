use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::search::models::GeoPoint;

/// Listing tier matching database enum `shop_tier`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "shop_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShopTier {
    #[default]
    Standard,
    Premium,
}

impl ShopTier {
    /// Higher ranks first in search results
    pub fn priority(self) -> u8 {
        match self {
            ShopTier::Premium => 1,
            ShopTier::Standard => 0,
        }
    }
}

impl std::fmt::Display for ShopTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShopTier::Standard => write!(f, "standard"),
            ShopTier::Premium => write!(f, "premium"),
        }
    }
}

/// Column list shared by every query that loads a [`Shop`]
pub const SHOP_COLUMNS: &str = r#"
    id, owner_id, name, airport_code, address, latitude, longitude,
    contact_person, phone, email, description,
    specializations_aircraft, specializations_services, faa_certifications,
    tier, photos, is_verified, created_at, updated_at
"#;

/// Database model for a maintenance shop
#[derive(Debug, Clone, FromRow)]
pub struct Shop {
    pub id: Uuid,
    /// Identity-provider user id of the single owner
    pub owner_id: String,
    pub name: String,
    pub airport_code: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
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

impl Shop {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Shop together with its review summary
#[derive(Debug, Clone)]
pub struct ShopDetail {
    pub shop: Shop,
    pub average_rating: f64,
    pub review_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_outranks_standard() {
        assert!(ShopTier::Premium.priority() > ShopTier::Standard.priority());
        assert_eq!(ShopTier::default(), ShopTier::Standard);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ShopTier::Premium).unwrap(), "premium");
        assert_eq!(ShopTier::Standard.to_string(), "standard");
    }
}
