use crate::core::config::IdentityConfig;
use crate::core::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// User object returned by the identity backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Session issued by the identity backend
#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: IdentityUser,
}

/// Signup either returns a session (auto-confirm) or just the user when the
/// account still has to confirm its email.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignupOutcome {
    Session(IdentitySession),
    PendingConfirmation(IdentityUser),
}

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    token_hash: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Error body; the backend has used several shapes across versions
#[derive(Debug, Default, Deserialize)]
struct IdentityErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

impl IdentityErrorResponse {
    fn code(&self) -> &str {
        self.error_code
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("")
    }

    fn message(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Identity provider rejected the request".to_string())
    }
}

/// Client for the hosted identity backend (GoTrue-compatible REST API)
pub struct IdentityClient {
    config: IdentityConfig,
    http_client: reqwest::Client,
}

impl IdentityClient {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Send a magic link / one-time code, creating the account on first use
    pub async fn send_otp(&self, email: &str, redirect_to: Option<&str>) -> Result<()> {
        let redirect = redirect_to.unwrap_or(&self.config.redirect_url);
        let url = format!(
            "{}/otp?redirect_to={}",
            self.config.base_url,
            urlencoding::encode(redirect)
        );

        tracing::debug!("Requesting OTP for {}", email);

        let body = OtpRequest {
            email,
            create_user: true,
        };
        self.post_json::<_, serde_json::Value>(&url, &body).await?;

        tracing::info!("OTP sent to {}", email);
        Ok(())
    }

    /// Exchange a magic-link token hash for a session
    pub async fn verify_otp(&self, token_hash: &str, kind: &str) -> Result<IdentitySession> {
        let url = format!("{}/verify", self.config.base_url);
        let body = VerifyRequest { kind, token_hash };
        self.post_json(&url, &body).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignupOutcome> {
        let url = format!("{}/signup", self.config.base_url);
        let body = PasswordRequest { email, password };
        let outcome: SignupOutcome = self.post_json(&url, &body).await?;

        match &outcome {
            SignupOutcome::Session(session) => {
                tracing::info!("User signed up: {}", session.user.id)
            }
            SignupOutcome::PendingConfirmation(user) => {
                tracing::info!("User signed up, confirmation pending: {}", user.id)
            }
        }
        Ok(outcome)
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession> {
        let url = format!("{}/token?grant_type=password", self.config.base_url);
        let body = PasswordRequest { email, password };
        self.post_json(&url, &body).await
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> Result<IdentitySession> {
        let url = format!("{}/token?grant_type=refresh_token", self.config.base_url);
        let body = RefreshRequest { refresh_token };
        self.post_json(&url, &body).await
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http_client
            .post(url)
            .header("apikey", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider unreachable: {}", e);
                AppError::Unavailable(format!("Identity provider unreachable: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                tracing::error!("Failed to parse identity provider response: {}", e);
                AppError::ExternalServiceError(format!("Failed to parse response: {}", e))
            });
        }

        let text = response.text().await.unwrap_or_default();
        let error: IdentityErrorResponse = serde_json::from_str(&text).unwrap_or_default();
        Err(map_identity_error(status.as_u16(), &error))
    }
}

fn map_identity_error(status: u16, error: &IdentityErrorResponse) -> AppError {
    let code = error.code();
    let message = error.message();

    match (status, code) {
        (_, "user_already_exists") | (_, "email_exists") => {
            AppError::Conflict("Email already registered".to_string())
        }
        (_, "invalid_grant") | (_, "invalid_credentials") => {
            AppError::Unauthorized("Invalid credentials".to_string())
        }
        (_, "otp_expired") => AppError::Unauthorized("Link is invalid or has expired".to_string()),
        (429, _) | (_, "over_email_send_rate_limit") => AppError::RateLimitExceeded(message),
        (400, _) | (422, _) => AppError::BadRequest(message),
        (401, _) | (403, _) => AppError::Unauthorized(message),
        _ => {
            tracing::error!("Identity provider error {}: {} ({})", status, message, code);
            AppError::ExternalServiceError(format!("Identity provider error: {}", status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(json: serde_json::Value) -> IdentityErrorResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_invalid_grant_maps_to_unauthorized() {
        let e = error(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }));
        assert!(matches!(map_identity_error(400, &e), AppError::Unauthorized(_)));
    }

    #[test]
    fn test_existing_user_maps_to_conflict() {
        let e = error(serde_json::json!({
            "code": 422,
            "error_code": "user_already_exists",
            "msg": "User already registered"
        }));
        assert!(matches!(map_identity_error(422, &e), AppError::Conflict(_)));
    }

    #[test]
    fn test_rate_limit_keeps_provider_message() {
        let e = error(serde_json::json!({
            "msg": "For security purposes, you can only request this once every 60 seconds"
        }));
        match map_identity_error(429, &e) {
            AppError::RateLimitExceeded(msg) => assert!(msg.contains("60 seconds")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_signup_outcome_distinguishes_session_and_user() {
        let pending: SignupOutcome = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "email": "owner@fixaplane.test",
            "email_confirmed_at": null
        }))
        .unwrap();
        assert!(matches!(pending, SignupOutcome::PendingConfirmation(_)));

        let session: SignupOutcome = serde_json::from_value(serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": { "id": "u-1", "email": "owner@fixaplane.test" }
        }))
        .unwrap();
        assert!(matches!(session, SignupOutcome::Session(_)));
    }
}
