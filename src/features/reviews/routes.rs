use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reviews::handlers;
use crate::features::reviews::services::ReviewService;

/// Public review routes
pub fn public_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route("/api/shops/{id}/reviews", get(handlers::list_reviews))
        .with_state(service)
}

/// Review routes that require JWT authentication
pub fn protected_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route("/api/shops/{id}/reviews", post(handlers::create_review))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_anonymous_user, with_member_auth, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use sqlx::postgres::PgPoolOptions;

    /// The pool never connects; these requests are rejected before any query
    fn service() -> Arc<ReviewService> {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        Arc::new(ReviewService::new(pool))
    }

    const SHOP_PATH: &str = "/api/shops/0190a0e4-7b1c-7d3e-9f00-000000000001/reviews";

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let server = TestServer::new(with_member_auth(protected_routes(service()))).unwrap();
        let response = server
            .post(SHOP_PATH)
            .json(&serde_json::json!({ "rating": 9 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_session_cannot_review() {
        let server =
            TestServer::new(with_user(protected_routes(service()), create_anonymous_user()))
                .unwrap();
        let response = server
            .post(SHOP_PATH)
            .json(&serde_json::json!({ "rating": 5 }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_shop_id_is_rejected() {
        let server = TestServer::new(public_routes(service())).unwrap();
        let response = server.get("/api/shops/not-a-uuid/reviews").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
