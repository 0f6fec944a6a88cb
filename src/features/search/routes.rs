use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::search::handlers;
use crate::features::search::services::SearchService;

/// Public search routes
pub fn routes(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/api/shops/search", get(handlers::search_shops))
        .route("/api/shops/map", get(handlers::shops_map))
        .with_state(service)
}
