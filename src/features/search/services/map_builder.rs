use crate::features::search::models::{GeoPoint, MapMarker, MapView, SearchResult};
use crate::shared::constants::DEFAULT_MAP_CENTER;

/// Markers, centre and bounds for a search result
pub fn build_map_view(results: &[SearchResult]) -> MapView {
    let markers: Vec<MapMarker> = results
        .iter()
        .map(|result| MapMarker {
            id: result.shop.id,
            name: result.shop.name.clone(),
            tier: result.shop.tier,
            location: result.shop.location(),
            average_rating: result.average_rating,
            distance: result.distance,
        })
        .collect();

    if markers.is_empty() {
        return MapView {
            markers,
            center: GeoPoint::new(DEFAULT_MAP_CENTER.0, DEFAULT_MAP_CENTER.1),
            bounds: None,
        };
    }

    let count = markers.len() as f64;
    let (sum_lat, sum_lng) = markers.iter().fold((0.0, 0.0), |(lat, lng), m| {
        (lat + m.location.lat, lng + m.location.lng)
    });

    let bounds = markers.iter().fold(
        [f64::MAX, f64::MAX, f64::MIN, f64::MIN],
        |[min_lat, min_lng, max_lat, max_lng], m| {
            [
                min_lat.min(m.location.lat),
                min_lng.min(m.location.lng),
                max_lat.max(m.location.lat),
                max_lng.max(m.location.lng),
            ]
        },
    );

    MapView {
        center: GeoPoint::new(sum_lat / count, sum_lng / count),
        bounds: Some(bounds),
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::shop_at;

    fn result(name: &str, lat: f64, lng: f64) -> SearchResult {
        SearchResult {
            shop: shop_at(name, lat, lng),
            average_rating: 4.5,
            review_count: 2,
            distance: 3.0,
        }
    }

    #[test]
    fn test_empty_result_uses_default_center() {
        let view = build_map_view(&[]);
        assert!(view.markers.is_empty());
        assert_eq!(view.center, GeoPoint::new(40.730610, -73.935242));
        assert!(view.bounds.is_none());
    }

    #[test]
    fn test_center_is_mean_of_markers() {
        let results = vec![result("A", 40.0, -74.0), result("B", 42.0, -72.0)];
        let view = build_map_view(&results);

        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.center, GeoPoint::new(41.0, -73.0));
        assert_eq!(view.bounds, Some([40.0, -74.0, 42.0, -72.0]));
        assert_eq!(view.markers[0].name, "A");
        assert_eq!(view.markers[0].average_rating, 4.5);
    }

    #[test]
    fn test_single_marker_bounds_collapse_to_point() {
        let view = build_map_view(&[result("Solo", 40.8501, -74.0608)]);
        assert_eq!(view.center, GeoPoint::new(40.8501, -74.0608));
        assert_eq!(view.bounds, Some([40.8501, -74.0608, 40.8501, -74.0608]));
    }
}
