use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::registry::services::AircraftRecord;

/// Request DTO for a registry lookup
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTailNumberDto {
    #[validate(length(max = 10, message = "Tail number must not exceed 10 characters"))]
    #[schema(example = "N12345")]
    pub tail_number: String,
}

/// Response DTO for a registry lookup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AircraftResponseDto {
    pub tail_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub aircraft_type: String,
}

impl From<AircraftRecord> for AircraftResponseDto {
    fn from(record: AircraftRecord) -> Self {
        Self {
            tail_number: record.tail_number,
            make: record.make,
            model: record.model,
            year: record.year,
            aircraft_type: record.aircraft_type,
        }
    }
}
