use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::shops::handlers;
use crate::features::shops::services::ShopService;

/// Public shop routes
pub fn public_routes(service: Arc<ShopService>) -> Router {
    Router::new()
        .route("/api/shops/{id}", get(handlers::get_shop))
        .with_state(service)
}

/// Owner routes (require JWT authentication)
pub fn protected_routes(service: Arc<ShopService>) -> Router {
    Router::new()
        .route("/api/shops", post(handlers::create_shop))
        .route("/api/shops/me", get(handlers::get_my_shop))
        .route(
            "/api/shops/{id}",
            put(handlers::update_shop).delete(handlers::delete_shop),
        )
        .route(
            "/api/shops/{id}/photos",
            post(handlers::upload_photos).delete(handlers::delete_photo),
        )
        .with_state(service)
}
