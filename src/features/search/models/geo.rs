use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Slack added to every box edge so points exactly on the circle stay inside
const BOX_MARGIN_DEGREES: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine distance in metres
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_METERS * c
    }

    /// Box that contains every point within `radius_meters`.
    ///
    /// The longitude half-width is the widest point of the spherical cap,
    /// `asin(sin(d) / cos(lat))` for angular radius `d`. Longitude bounds are
    /// dropped when the cap covers a pole or crosses the antimeridian.
    pub fn bounding_box(&self, radius_meters: f64) -> BoundingBox {
        let angular = radius_meters / EARTH_RADIUS_METERS;
        if angular >= std::f64::consts::PI {
            return BoundingBox::WORLD;
        }

        let lat_delta = angular.to_degrees() + BOX_MARGIN_DEGREES;
        let min_lat = self.lat - lat_delta;
        let max_lat = self.lat + lat_delta;
        if min_lat <= -90.0 || max_lat >= 90.0 {
            return BoundingBox {
                min_lat: min_lat.max(-90.0),
                max_lat: max_lat.min(90.0),
                lng_range: None,
            };
        }

        let sin_angular = angular.sin();
        let cos_lat = self.lat.to_radians().cos();
        let lng_range = if sin_angular >= cos_lat {
            None
        } else {
            let lng_delta = (sin_angular / cos_lat).asin().to_degrees() + BOX_MARGIN_DEGREES;
            let (min_lng, max_lng) = (self.lng - lng_delta, self.lng + lng_delta);
            if min_lng < -180.0 || max_lng > 180.0 {
                None
            } else {
                Some((min_lng, max_lng))
            }
        };

        BoundingBox {
            min_lat,
            max_lat,
            lng_range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub lng_range: Option<(f64, f64)>,
}

impl BoundingBox {
    pub const WORLD: BoundingBox = BoundingBox {
        min_lat: -90.0,
        max_lat: 90.0,
        lng_range: None,
    };

    pub fn contains(&self, point: &GeoPoint) -> bool {
        let lat_ok = point.lat >= self.min_lat && point.lat <= self.max_lat;
        let lng_ok = self
            .lng_range
            .is_none_or(|(min, max)| point.lng >= min && point.lng <= max);
        lat_ok && lng_ok
    }
}

/// Unit of the search radius and of reported distances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// Statute miles
    #[default]
    #[serde(alias = "mi")]
    Miles,
    #[serde(alias = "nm")]
    Nautical,
    #[serde(alias = "km")]
    Kilometers,
}

impl DistanceUnit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Miles => 1609.344,
            DistanceUnit::Nautical => 1852.0,
            DistanceUnit::Kilometers => 1000.0,
        }
    }

    pub fn to_meters(self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KTEB: GeoPoint = GeoPoint {
        lat: 40.8501,
        lng: -74.0608,
    };

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(KTEB.distance_meters(&KTEB), 0.0);
    }

    #[test]
    fn test_teterboro_to_nearby_shop() {
        let shop = GeoPoint::new(40.80, -74.00);
        let miles = DistanceUnit::Miles.from_meters(KTEB.distance_meters(&shop));
        assert!(miles > 4.0 && miles < 5.0, "got {}", miles);
    }

    #[test]
    fn test_teterboro_to_washington_national() {
        let dca = GeoPoint::new(38.8512, -77.0402);
        let miles = DistanceUnit::Miles.from_meters(KTEB.distance_meters(&dca));
        assert!(miles > 190.0 && miles < 215.0, "got {}", miles);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(DistanceUnit::Kilometers.to_meters(2.0), 2000.0);
        assert_eq!(DistanceUnit::Nautical.from_meters(1852.0), 1.0);
        assert!((DistanceUnit::Miles.to_meters(50.0) - 80_467.2).abs() < 1e-6);
    }

    #[test]
    fn test_unit_parses_names_and_aliases() {
        let unit: DistanceUnit = serde_json::from_value(serde_json::json!("nm")).unwrap();
        assert_eq!(unit, DistanceUnit::Nautical);
        let unit: DistanceUnit = serde_json::from_value(serde_json::json!("kilometers")).unwrap();
        assert_eq!(unit, DistanceUnit::Kilometers);
        assert_eq!(DistanceUnit::default(), DistanceUnit::Miles);
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        let radius = DistanceUnit::Miles.to_meters(50.0);
        let bbox = KTEB.bounding_box(radius);
        let (min_lng, max_lng) = bbox.lng_range.unwrap();

        // Points exactly `radius` north and east must fall inside the box
        let north_deg = radius / EARTH_RADIUS_METERS * 180.0 / std::f64::consts::PI;
        assert!(bbox.max_lat >= KTEB.lat + north_deg);
        assert!(bbox.min_lat <= KTEB.lat - north_deg);
        assert!(min_lng < KTEB.lng && max_lng > KTEB.lng);
    }

    #[test]
    fn test_bounding_box_near_antimeridian_drops_longitude() {
        let point = GeoPoint::new(51.0, 179.5);
        let bbox = point.bounding_box(200_000.0);
        assert!(bbox.lng_range.is_none());
    }

    /// Points on a ring at `fraction` of the radius around `origin`
    fn ring(origin: GeoPoint, radius_meters: f64, fraction: f64) -> Vec<GeoPoint> {
        let angular = radius_meters * fraction / EARTH_RADIUS_METERS;
        let lat1 = origin.lat.to_radians();
        (0..720)
            .map(|step| {
                let bearing = (step as f64 * 0.5).to_radians();
                let lat2 = (lat1.sin() * angular.cos()
                    + lat1.cos() * angular.sin() * bearing.cos())
                .asin();
                let lng2 = origin.lng.to_radians()
                    + (bearing.sin() * angular.sin() * lat1.cos())
                        .atan2(angular.cos() - lat1.sin() * lat2.sin());
                let mut lng = lng2.to_degrees();
                if lng > 180.0 {
                    lng -= 360.0;
                } else if lng < -180.0 {
                    lng += 360.0;
                }
                GeoPoint::new(lat2.to_degrees(), lng)
            })
            .collect()
    }

    fn assert_ring_inside(origin: GeoPoint, radius_meters: f64) {
        let bbox = origin.bounding_box(radius_meters);
        for point in ring(origin, radius_meters, 0.9999) {
            assert!(
                point.distance_meters(&origin) <= radius_meters,
                "ring point {:?} is outside the radius",
                point
            );
            assert!(
                bbox.contains(&point),
                "{:?} within radius but outside {:?}",
                point,
                bbox
            );
        }
    }

    #[test]
    fn test_bounding_box_keeps_wide_radius_points_at_teterboro() {
        assert_ring_inside(KTEB, DistanceUnit::Miles.to_meters(1000.0));
        assert_ring_inside(KTEB, DistanceUnit::Miles.to_meters(2500.0));
    }

    #[test]
    fn test_bounding_box_keeps_point_east_of_teterboro_at_1000_miles() {
        let bbox = KTEB.bounding_box(DistanceUnit::Miles.to_meters(1000.0));
        let east = GeoPoint::new(41.2, -54.843);
        assert!(DistanceUnit::Miles.from_meters(KTEB.distance_meters(&east)) < 1000.0);
        assert!(bbox.contains(&east));
    }

    #[test]
    fn test_bounding_box_over_pole_drops_longitude() {
        let origin = GeoPoint::new(85.0, 0.0);
        let bbox = origin.bounding_box(1_000_000.0);
        assert!(bbox.lng_range.is_none());
        assert_eq!(bbox.max_lat, 90.0);

        let far_side = GeoPoint::new(88.0, 180.0);
        assert!(origin.distance_meters(&far_side) < 1_000_000.0);
        assert!(bbox.contains(&far_side));
    }

    #[test]
    fn test_bounding_box_for_huge_radius_is_world() {
        assert_eq!(KTEB.bounding_box(25_000_000.0), BoundingBox::WORLD);
    }
}
