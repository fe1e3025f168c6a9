use crate::{
    AppState,
    handlers::{categories, posts},
};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that need no credentials: health checks and every read of posts and
/// categories.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers and monitoring.
        .route("/health", get(|| async { "ok" }))
        // GET /api/v1/posts?pageNo=&pageSize=&sortBy=&sortDir=
        .route("/api/v1/posts", get(posts::get_all_post))
        .route("/api/v1/posts/{id}", get(posts::get_post_by_id_v1))
        .route(
            "/api/v1/posts/category/{id}",
            get(posts::get_post_by_category),
        )
        .route("/api/categories", get(categories::get_categories))
        .route("/api/categories/{id}", get(categories::get_category))
}
