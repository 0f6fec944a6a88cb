use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::search::error::SearchError;
use crate::features::search::models::{BoundingBox, GeoPoint};
use crate::features::shops::models::Shop;

/// Store-side filters for a search. Implementations may over-return;
/// ranking re-checks every condition.
#[derive(Debug, Clone, Default)]
pub struct CandidateQuery {
    pub origin: Option<GeoPoint>,
    pub radius_meters: Option<f64>,
    pub aircraft_tags: Vec<String>,
    pub service_tags: Vec<String>,
    /// Case-insensitive substring of the shop's own airport code
    pub airport_contains: Option<String>,
}

impl CandidateQuery {
    /// Prefilter box around the origin, if both origin and radius are set
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match (self.origin, self.radius_meters) {
            (Some(origin), Some(radius)) => Some(origin.bounding_box(radius)),
            _ => None,
        }
    }

    /// Store-side predicate: bounding box, tag overlap and airport substring
    pub fn admits(&self, shop: &Shop) -> bool {
        let in_box = self
            .bounding_box()
            .is_none_or(|bbox| bbox.contains(&shop.location()));

        in_box
            && tags_overlap(&self.aircraft_tags, &shop.specializations_aircraft)
            && tags_overlap(&self.service_tags, &shop.specializations_services)
            && airport_code_contains(&shop.airport_code, self.airport_contains.as_deref())
    }
}

/// True when nothing is wanted or at least one wanted tag is offered
pub fn tags_overlap(wanted: &[String], offered: &[String]) -> bool {
    wanted.is_empty() || wanted.iter().any(|tag| offered.contains(tag))
}

pub fn airport_code_contains(airport_code: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => airport_code
            .to_uppercase()
            .contains(&needle.to_uppercase()),
        None => true,
    }
}

/// One review's rating, keyed by shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct ReviewRating {
    pub shop_id: Uuid,
    pub rating: i32,
}

/// Read access to shops and their review ratings
#[async_trait]
pub trait ShopDirectory: Send + Sync {
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Shop>, SearchError>;

    /// Ratings of every review for the given shops, fetched in one call
    async fn review_ratings(&self, shop_ids: &[Uuid]) -> Result<Vec<ReviewRating>, SearchError>;
}
