use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use super::directory::{airport_code_contains, tags_overlap, ReviewRating};
use crate::features::search::models::{DistanceUnit, GeoPoint, SearchResult};
use crate::features::shops::models::Shop;

/// Filters applied while ranking
#[derive(Debug, Clone)]
pub struct RankCriteria<'a> {
    pub origin: Option<GeoPoint>,
    /// Only meaningful together with `origin`
    pub radius_meters: Option<f64>,
    pub unit: DistanceUnit,
    pub aircraft_tags: &'a [String],
    pub service_tags: &'a [String],
    pub min_rating: f64,
    pub airport_contains: Option<&'a str>,
}

/// Attach ratings and distance to candidates, drop the ones that fail a
/// filter and order the rest: premium first, then nearest, then name and id.
///
/// Duplicate candidates collapse to the last one seen.
pub fn rank(
    candidates: Vec<Shop>,
    ratings: &[ReviewRating],
    criteria: &RankCriteria<'_>,
) -> Vec<SearchResult> {
    let mut totals: HashMap<Uuid, (i64, i64)> = HashMap::new();
    for rating in ratings {
        let entry = totals.entry(rating.shop_id).or_insert((0, 0));
        entry.0 += i64::from(rating.rating);
        entry.1 += 1;
    }

    let mut unique: HashMap<Uuid, Shop> = HashMap::with_capacity(candidates.len());
    for shop in candidates {
        unique.insert(shop.id, shop);
    }

    let mut results: Vec<SearchResult> = unique
        .into_values()
        .filter_map(|shop| {
            if !tags_overlap(criteria.aircraft_tags, &shop.specializations_aircraft)
                || !tags_overlap(criteria.service_tags, &shop.specializations_services)
            {
                return None;
            }
            if !airport_code_contains(&shop.airport_code, criteria.airport_contains) {
                return None;
            }

            let meters = criteria
                .origin
                .map(|origin| origin.distance_meters(&shop.location()))
                .unwrap_or(0.0);
            if let (Some(_), Some(radius)) = (criteria.origin, criteria.radius_meters) {
                if meters > radius {
                    return None;
                }
            }

            let (sum, count) = totals.get(&shop.id).copied().unwrap_or((0, 0));
            let average_rating = if count == 0 {
                0.0
            } else {
                sum as f64 / count as f64
            };
            if average_rating < criteria.min_rating {
                return None;
            }

            Some(SearchResult {
                shop,
                average_rating,
                review_count: count,
                distance: criteria.unit.from_meters(meters),
            })
        })
        .collect();

    results.sort_by(compare_results);
    results
}

fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.shop
        .tier
        .priority()
        .cmp(&a.shop.tier.priority())
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| a.shop.name.cmp(&b.shop.name))
        .then_with(|| a.shop.id.cmp(&b.shop.id))
}
