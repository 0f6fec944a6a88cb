use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::airports::models::Airport;

/// Query parameters for listing airports
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AirportSearchQuery {
    /// Substring of the airport code or name (case-insensitive)
    #[param(example = "TEB")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AirportResponseDto {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<&Airport> for AirportResponseDto {
    fn from(airport: &Airport) -> Self {
        Self {
            code: airport.code.clone(),
            name: airport.name.clone(),
            lat: airport.latitude,
            lng: airport.longitude,
        }
    }
}
