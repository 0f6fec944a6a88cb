use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role the identity backend assigns to signed-in (non-anonymous) users
pub const AUTHENTICATED_ROLE: &str = "authenticated";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Identity-provider user id (`sub` claim); shops are owned by this id
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    /// Session id (absent for service tokens)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl AuthenticatedUser {
    /// A real account: signed in through OTP or password, not an anonymous session
    pub fn is_member(&self) -> bool {
        self.role == AUTHENTICATED_ROLE && !self.is_anonymous
    }
}
