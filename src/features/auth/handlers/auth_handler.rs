use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    MeResponseDto, OtpRequestDto, PasswordAuthRequestDto, RefreshTokenRequestDto,
    SessionResponseDto, SignupResponseDto, VerifyOtpRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Send a magic link to the given email
#[utoipa::path(
    post,
    path = "/api/auth/otp",
    request_body = OtpRequestDto,
    responses(
        (status = 200, description = "Magic link sent"),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests for this email")
    ),
    tag = "auth"
)]
pub async fn request_otp(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<OtpRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.request_otp(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Check your email for the magic link.".to_string()),
        None,
    )))
}

/// Exchange a magic-link token for a session
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    request_body = VerifyOtpRequestDto,
    responses(
        (status = 200, description = "Session created", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Link invalid or expired")
    ),
    tag = "auth"
)]
pub async fn verify_otp(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<VerifyOtpRequestDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = service.verify_otp(dto).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

/// Register with email and password
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = PasswordAuthRequestDto,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<SignupResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn sign_up(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<PasswordAuthRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<SignupResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.sign_up(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = PasswordAuthRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<SessionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<PasswordAuthRequestDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = service.refresh_token(dto).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    Ok(Json(ApiResponse::success(
        Some(service.current_user(user)),
        None,
        None,
    )))
}
