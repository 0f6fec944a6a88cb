mod geo;
mod search_result;

pub use geo::{BoundingBox, DistanceUnit, GeoPoint, EARTH_RADIUS_METERS};
pub use search_result::{MapMarker, MapView, SearchFilters, SearchResult};
