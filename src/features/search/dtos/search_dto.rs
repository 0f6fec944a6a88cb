use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::search::models::{
    DistanceUnit, GeoPoint, MapMarker, MapView, SearchFilters, SearchResult,
};
use crate::features::shops::dtos::ShopResponseDto;
use crate::features::shops::models::ShopTier;
use crate::shared::validation::split_tags;

/// Query parameters shared by search and map
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Airport code to search around; omit for all shops
    #[param(example = "KTEB")]
    pub airport_code: Option<String>,

    /// Search radius (default 50), only used with an airport code
    #[param(example = 50)]
    pub radius: Option<f64>,

    /// Unit of `radius` and of returned distances (default miles)
    pub unit: Option<DistanceUnit>,

    /// Comma-separated aircraft types; a shop must support at least one
    #[param(example = "Cessna,Piper")]
    pub aircraft_tags: Option<String>,

    /// Comma-separated services; a shop must offer at least one
    #[param(example = "Annual,Avionics")]
    pub service_tags: Option<String>,

    /// Minimum average rating, 0 to 5
    #[param(minimum = 0, maximum = 5)]
    pub min_rating: Option<f64>,

    /// Case-insensitive substring of the shop's airport code, e.g. `TEB`
    #[param(example = "TEB")]
    pub airport_contains: Option<String>,
}

impl From<SearchQuery> for SearchFilters {
    fn from(query: SearchQuery) -> Self {
        Self {
            airport_code: query.airport_code,
            radius: query.radius,
            unit: query.unit.unwrap_or_default(),
            aircraft_tags: split_tags(query.aircraft_tags.as_deref()),
            service_tags: split_tags(query.service_tags.as_deref()),
            min_rating: query.min_rating.unwrap_or(0.0),
            airport_contains: query.airport_contains,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultDto {
    #[serde(flatten)]
    pub shop: ShopResponseDto,
    pub average_rating: f64,
    pub review_count: i64,
    /// Distance from the airport in the requested unit, 0 without an airport
    pub distance: f64,
}

impl From<SearchResult> for SearchResultDto {
    fn from(result: SearchResult) -> Self {
        Self {
            shop: result.shop.into(),
            average_rating: result.average_rating,
            review_count: result.review_count,
            distance: result.distance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkerDto {
    pub id: Uuid,
    pub name: String,
    pub tier: ShopTier,
    pub lat: f64,
    pub lng: f64,
    pub average_rating: f64,
    pub distance: f64,
}

impl From<MapMarker> for MapMarkerDto {
    fn from(marker: MapMarker) -> Self {
        Self {
            id: marker.id,
            name: marker.name,
            tier: marker.tier,
            lat: marker.location.lat,
            lng: marker.location.lng,
            average_rating: marker.average_rating,
            distance: marker.distance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapCenterDto {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for MapCenterDto {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapResponseDto {
    pub markers: Vec<MapMarkerDto>,
    pub center: MapCenterDto,
    /// `[minLat, minLng, maxLat, maxLng]`, absent when there are no markers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Vec<f64>>,
}

impl From<MapView> for MapResponseDto {
    fn from(view: MapView) -> Self {
        Self {
            markers: view.markers.into_iter().map(Into::into).collect(),
            center: view.center.into(),
            bounds: view.bounds.map(|b| b.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_splits_tags_and_applies_defaults() {
        let filters: SearchFilters = SearchQuery {
            airport_code: Some("KTEB".to_string()),
            aircraft_tags: Some("Cessna, Piper,,Cessna".to_string()),
            ..SearchQuery::default()
        }
        .into();

        assert_eq!(filters.aircraft_tags, vec!["Cessna", "Piper"]);
        assert!(filters.service_tags.is_empty());
        assert_eq!(filters.unit, DistanceUnit::Miles);
        assert_eq!(filters.min_rating, 0.0);
        assert!(filters.radius.is_none());
        assert!(filters.airport_contains.is_none());
    }
}
