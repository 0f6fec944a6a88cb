use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::airports::handlers;
use crate::features::airports::services::AirportService;

/// Public airport lookup routes
pub fn routes(service: Arc<AirportService>) -> Router {
    Router::new()
        .route("/api/airports", get(handlers::list_airports))
        .route("/api/airports/{code}", get(handlers::get_airport))
        .with_state(service)
}
