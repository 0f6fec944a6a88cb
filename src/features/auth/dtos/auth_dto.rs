use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;

/// Request DTO for passwordless sign-in (magic link / one-time code)
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Where the magic link should land (defaults to the shop edit page)
    #[validate(url(message = "redirectTo must be a valid URL"))]
    pub redirect_to: Option<String>,
}

/// Request DTO for exchanging a magic-link token for a session
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequestDto {
    #[validate(length(min = 1, message = "tokenHash is required"))]
    pub token_hash: String,

    /// Verification type from the link (e.g. "magiclink", "email", "signup")
    #[validate(length(min = 1, max = 32, message = "type is required"))]
    #[serde(rename = "type")]
    pub kind: String,
}

/// Request DTO for password sign-up and sign-in
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordAuthRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequestDto {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Session returned by verify/login/refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseDto {
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: AuthUserDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserDto {
    pub id: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
}

/// Sign-up result; `session` is absent while the email is unconfirmed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponseDto {
    pub user: AuthUserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionResponseDto>,
    pub confirmation_required: bool,
}

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseDto {
    pub user_id: String,
    pub email: Option<String>,
    pub role: String,
    pub session_id: Option<String>,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            role: user.role,
            session_id: user.session_id,
        }
    }
}
