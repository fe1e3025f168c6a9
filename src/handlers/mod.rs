/// Handlers for `/api/v1/posts`.
pub mod posts;

/// Handlers for `/api/categories`.
pub mod categories;
