use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::registry::dtos::{AircraftResponseDto, ValidateTailNumberDto};
use crate::features::registry::services::RegistryLookup;
use crate::shared::types::ApiResponse;

/// Look up an aircraft by tail number
#[utoipa::path(
    post,
    path = "/api/registry/validate",
    request_body = ValidateTailNumberDto,
    responses(
        (status = 200, description = "Aircraft found", body = ApiResponse<AircraftResponseDto>),
        (status = 400, description = "Missing or invalid N-Number")
    ),
    tag = "registry"
)]
pub async fn validate_tail_number(
    State(registry): State<Arc<dyn RegistryLookup>>,
    AppJson(dto): AppJson<ValidateTailNumberDto>,
) -> Result<Json<ApiResponse<AircraftResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = registry.lookup(&dto.tail_number).await?;
    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}
