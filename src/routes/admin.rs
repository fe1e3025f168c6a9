use crate::{
    AppState,
    auth::require_admin,
    handlers::{categories, posts},
};
use axum::{
    Router, middleware,
    routing::{post, put},
};

/// Admin Router Module
///
/// Every create, update and delete endpoint. The `require_admin` route layer runs before
/// the handler: no bearer token (or a bad one) is a 401, a token without the ADMIN role
/// is a 403, and in both cases the handler never executes.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // POST /api/v1/posts
        .route("/api/v1/posts", post(posts::create_post))
        // PUT/DELETE /api/v1/posts/{id}
        .route(
            "/api/v1/posts/{id}",
            put(posts::update_post).delete(posts::delete_post),
        )
        // POST /api/categories
        .route("/api/categories", post(categories::add_category))
        // PUT/DELETE /api/categories/{id}
        .route(
            "/api/categories/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}
