use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireMember;
use crate::features::reviews::dtos::{CreateReviewDto, ReviewResponseDto};
use crate::features::reviews::services::ReviewService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List reviews of a shop
#[utoipa::path(
    get,
    path = "/api/shops/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Shop id"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Reviews, newest first", body = ApiResponse<Vec<ReviewResponseDto>>),
        (status = 404, description = "Shop not found")
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(service): State<Arc<ReviewService>>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewResponseDto>>>> {
    let (reviews, total) = service.list_reviews(id, &pagination).await?;
    let dtos: Vec<ReviewResponseDto> = reviews.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Review a shop
#[utoipa::path(
    post,
    path = "/api/shops/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Shop id")
    ),
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Owners cannot review their own shop"),
        (status = 404, description = "Shop not found")
    ),
    tag = "reviews",
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    RequireMember(user): RequireMember,
    State(service): State<Arc<ReviewService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let review = service.create_review(id, &user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(review.into()),
            Some("Thanks for your review".to_string()),
            None,
        )),
    ))
}
