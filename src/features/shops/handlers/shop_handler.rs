use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireMember;
use crate::features::shops::dtos::{
    DeletePhotoDto, ShopDetailDto, ShopRequestDto, ShopResponseDto, UploadPhotosDto,
};
use crate::features::shops::services::{PhotoUpload, ShopService};
use crate::shared::types::ApiResponse;

/// Get a shop by id
#[utoipa::path(
    get,
    path = "/api/shops/{id}",
    params(
        ("id" = Uuid, Path, description = "Shop id")
    ),
    responses(
        (status = 200, description = "Shop details with rating summary", body = ApiResponse<ShopDetailDto>),
        (status = 404, description = "Shop not found")
    ),
    tag = "shops"
)]
pub async fn get_shop(
    State(service): State<Arc<ShopService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ShopDetailDto>>> {
    let detail = service.get_shop(id).await?;
    Ok(Json(ApiResponse::success(Some(detail.into()), None, None)))
}

/// Get the caller's shop
#[utoipa::path(
    get,
    path = "/api/shops/me",
    responses(
        (status = 200, description = "The caller's shop", body = ApiResponse<ShopDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "The caller has no shop yet")
    ),
    tag = "shops",
    security(("bearer_auth" = []))
)]
pub async fn get_my_shop(
    RequireMember(user): RequireMember,
    State(service): State<Arc<ShopService>>,
) -> Result<Json<ApiResponse<ShopDetailDto>>> {
    let detail = service.get_shop_by_owner(&user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(detail.into()), None, None)))
}

/// Create the caller's shop
#[utoipa::path(
    post,
    path = "/api/shops",
    request_body = ShopRequestDto,
    responses(
        (status = 201, description = "Shop created", body = ApiResponse<ShopResponseDto>),
        (status = 400, description = "Validation error or unknown airport"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "The caller already has a shop")
    ),
    tag = "shops",
    security(("bearer_auth" = []))
)]
pub async fn create_shop(
    RequireMember(user): RequireMember,
    State(service): State<Arc<ShopService>>,
    AppJson(dto): AppJson<ShopRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ShopResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let shop = service.create_shop(&user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(shop.into()),
            Some("Shop created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a shop
#[utoipa::path(
    put,
    path = "/api/shops/{id}",
    params(
        ("id" = Uuid, Path, description = "Shop id")
    ),
    request_body = ShopRequestDto,
    responses(
        (status = 200, description = "Shop updated", body = ApiResponse<ShopResponseDto>),
        (status = 400, description = "Validation error or unknown airport"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the shop owner"),
        (status = 404, description = "Shop not found")
    ),
    tag = "shops",
    security(("bearer_auth" = []))
)]
pub async fn update_shop(
    RequireMember(user): RequireMember,
    State(service): State<Arc<ShopService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ShopRequestDto>,
) -> Result<Json<ApiResponse<ShopResponseDto>>> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let shop = service.update_shop(id, &user.user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(shop.into()),
        Some("Shop updated successfully".to_string()),
        None,
    )))
}

/// Delete a shop
#[utoipa::path(
    delete,
    path = "/api/shops/{id}",
    params(
        ("id" = Uuid, Path, description = "Shop id")
    ),
    responses(
        (status = 200, description = "Shop deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the shop owner"),
        (status = 404, description = "Shop not found")
    ),
    tag = "shops",
    security(("bearer_auth" = []))
)]
pub async fn delete_shop(
    RequireMember(user): RequireMember,
    State(service): State<Arc<ShopService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_shop(id, &user.user_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Shop deleted successfully".to_string()),
        None,
    )))
}

/// Upload shop photos
///
/// Accepts multipart/form-data with one or more `file` fields.
#[utoipa::path(
    post,
    path = "/api/shops/{id}/photos",
    params(
        ("id" = Uuid, Path, description = "Shop id")
    ),
    request_body(
        content = UploadPhotosDto,
        content_type = "multipart/form-data",
        description = "Image files to add to the shop",
    ),
    responses(
        (status = 201, description = "Photos uploaded", body = ApiResponse<ShopResponseDto>),
        (status = 400, description = "Missing, too large or unsupported file"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the shop owner"),
        (status = 404, description = "Shop not found")
    ),
    tag = "shops",
    security(("bearer_auth" = []))
)]
pub async fn upload_photos(
    RequireMember(user): RequireMember,
    State(service): State<Arc<ShopService>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ShopResponseDto>>)> {
    let mut photos = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        photos.push(PhotoUpload {
            data: data.to_vec(),
            content_type,
        });
    }

    let shop = service.add_photos(id, &user.user_id, photos).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(shop.into()), None, None)),
    ))
}

/// Remove a shop photo
#[utoipa::path(
    delete,
    path = "/api/shops/{id}/photos",
    params(
        ("id" = Uuid, Path, description = "Shop id")
    ),
    request_body = DeletePhotoDto,
    responses(
        (status = 200, description = "Photo removed", body = ApiResponse<ShopResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the shop owner"),
        (status = 404, description = "Shop or photo not found")
    ),
    tag = "shops",
    security(("bearer_auth" = []))
)]
pub async fn delete_photo(
    RequireMember(user): RequireMember,
    State(service): State<Arc<ShopService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<DeletePhotoDto>,
) -> Result<Json<ApiResponse<ShopResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let shop = service.remove_photo(id, &user.user_id, &dto.url).await?;
    Ok(Json(ApiResponse::success(
        Some(shop.into()),
        Some("Photo removed".to_string()),
        None,
    )))
}
