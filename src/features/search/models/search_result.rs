use uuid::Uuid;

use super::geo::{DistanceUnit, GeoPoint};
use crate::features::shops::models::{Shop, ShopTier};

/// Validated search filters
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Empty or absent disables geo filtering
    pub airport_code: Option<String>,
    /// Falls back to the configured default radius
    pub radius: Option<f64>,
    pub unit: DistanceUnit,
    pub aircraft_tags: Vec<String>,
    pub service_tags: Vec<String>,
    pub min_rating: f64,
    /// Substring of the shop's own airport code; independent of the geo filter
    pub airport_contains: Option<String>,
}

/// A shop as returned by search
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub shop: Shop,
    /// Mean review rating, 0 without reviews
    pub average_rating: f64,
    pub review_count: i64,
    /// In the requested unit, 0 without a reference airport
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: Uuid,
    pub name: String,
    pub tier: ShopTier,
    pub location: GeoPoint,
    pub average_rating: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    pub center: GeoPoint,
    /// `[min_lat, min_lng, max_lat, max_lng]`, absent without markers
    pub bounds: Option<[f64; 4]>,
}
