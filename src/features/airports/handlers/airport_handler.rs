use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::airports::dtos::{AirportResponseDto, AirportSearchQuery};
use crate::features::airports::services::AirportService;
use crate::shared::types::{ApiResponse, Meta};

/// List airports
#[utoipa::path(
    get,
    path = "/api/airports",
    params(AirportSearchQuery),
    responses(
        (status = 200, description = "Airports ordered by code", body = ApiResponse<Vec<AirportResponseDto>>)
    ),
    tag = "airports"
)]
pub async fn list_airports(
    State(service): State<Arc<AirportService>>,
    Query(query): Query<AirportSearchQuery>,
) -> Result<Json<ApiResponse<Vec<AirportResponseDto>>>> {
    let airports: Vec<AirportResponseDto> = service
        .search(query.search.as_deref())
        .into_iter()
        .map(Into::into)
        .collect();
    let total = airports.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(airports),
        None,
        Some(Meta { total }),
    )))
}

/// Get an airport by code
#[utoipa::path(
    get,
    path = "/api/airports/{code}",
    params(
        ("code" = String, Path, description = "Airport code, e.g. KTEB (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Airport details", body = ApiResponse<AirportResponseDto>),
        (status = 404, description = "Airport not found")
    ),
    tag = "airports"
)]
pub async fn get_airport(
    State(service): State<Arc<AirportService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<AirportResponseDto>>> {
    let airport = service
        .resolve(&code)
        .ok_or_else(|| AppError::NotFound(format!("Airport '{}' not found", code)))?;

    Ok(Json(ApiResponse::success(Some(airport.into()), None, None)))
}
