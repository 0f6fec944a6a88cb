use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::registry::handlers;
use crate::features::registry::services::RegistryLookup;

/// Public registry routes
pub fn routes(registry: Arc<dyn RegistryLookup>) -> Router {
    Router::new()
        .route(
            "/api/registry/validate",
            post(handlers::validate_tail_number),
        )
        .with_state(registry)
}
