use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

/// Access-token claims issued by the identity backend
#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,

    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    is_anonymous: bool,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let signing_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        // The header algorithm must match the key type; never trust `alg` alone
        if header.alg != signing_key.algorithm {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Key {} requires {:?}",
                header.alg, kid, signing_key.algorithm
            )));
        }

        let mut validation = Validation::new(signing_key.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &signing_key.key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        Ok(claims_to_user(token_data.claims))
    }
}

fn claims_to_user(claims: Claims) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email.filter(|e| !e.is_empty()),
        role: claims.role.unwrap_or_else(|| "anon".to_string()),
        session_id: claims.session_id,
        is_anonymous: claims.is_anonymous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_to_user_maps_identity_fields() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "8f0c7a52-0000-4000-8000-000000000001",
            "iss": "https://auth.example.test/auth/v1",
            "aud": "authenticated",
            "exp": 4_000_000_000u64,
            "email": "owner@fixaplane.test",
            "role": "authenticated",
            "session_id": "s-1"
        }))
        .unwrap();

        let user = claims_to_user(claims);
        assert_eq!(user.user_id, "8f0c7a52-0000-4000-8000-000000000001");
        assert_eq!(user.email.as_deref(), Some("owner@fixaplane.test"));
        assert!(user.is_member());
    }

    #[test]
    fn test_claims_without_role_are_anonymous() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": "abc",
            "iss": "issuer",
            "aud": ["authenticated"],
            "exp": 1u64,
            "email": ""
        }))
        .unwrap();

        let user = claims_to_user(claims);
        assert_eq!(user.role, "anon");
        assert!(user.email.is_none());
        assert!(!user.is_member());
    }
}
