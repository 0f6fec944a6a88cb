//! Authorization guards for the application.
//!
//! Read endpoints only need a valid token (`AuthenticatedUser` extractor).
//! Anything that writes marketplace data requires a full member account:
//! anonymous sessions issued by the identity backend are rejected.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for signed-in members (role `authenticated`, not anonymous).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireMember(user): RequireMember) { ... }
/// ```
pub struct RequireMember(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireMember
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_member() {
            return Err(AppError::Forbidden(
                "A confirmed account is required".to_string(),
            ));
        }

        Ok(RequireMember(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_anonymous_user, with_member_auth, with_user};
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn whoami(RequireMember(user): RequireMember) -> String {
        user.user_id
    }

    fn router() -> Router {
        Router::new().route("/whoami", get(whoami))
    }

    #[tokio::test]
    async fn test_member_is_allowed() {
        let server = TestServer::new(with_member_auth(router())).unwrap();
        let response = server.get("/whoami").await;
        response.assert_status_ok();
        response.assert_text(crate::shared::test_helpers::TEST_USER_ID);
    }

    #[tokio::test]
    async fn test_anonymous_session_is_forbidden() {
        let server = TestServer::new(with_user(router(), create_anonymous_user())).unwrap();
        server
            .get("/whoami")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let server = TestServer::new(router()).unwrap();
        server
            .get("/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
