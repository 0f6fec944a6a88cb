use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::search::dtos::{MapResponseDto, SearchQuery, SearchResultDto};
use crate::features::search::services::SearchService;
use crate::shared::types::{ApiResponse, Meta};

/// Search shops near an airport
#[utoipa::path(
    get,
    path = "/api/shops/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Shops ordered by tier, then distance", body = ApiResponse<Vec<SearchResultDto>>),
        (status = 400, description = "Invalid radius or minimum rating"),
        (status = 404, description = "Airport not found"),
        (status = 503, description = "Shop directory unavailable")
    ),
    tag = "search"
)]
pub async fn search_shops(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchResultDto>>>> {
    let results = service.search(&query.into()).await?;
    let total = results.len() as i64;
    let dtos: Vec<SearchResultDto> = results.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Map markers for a search
#[utoipa::path(
    get,
    path = "/api/shops/map",
    params(SearchQuery),
    responses(
        (status = 200, description = "Markers, centre and bounds", body = ApiResponse<MapResponseDto>),
        (status = 400, description = "Invalid radius or minimum rating"),
        (status = 404, description = "Airport not found"),
        (status = 503, description = "Shop directory unavailable")
    ),
    tag = "search"
)]
pub async fn shops_map(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<MapResponseDto>>> {
    let view = service.map(&query.into()).await?;
    Ok(Json(ApiResponse::success(Some(view.into()), None, None)))
}
