use crate::{
    models::{Category, CategoryDraft, Post, PostDraft},
    pagination::{Page, PageRequest},
};
use async_trait::async_trait;
use std::sync::Arc;

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// Result of a persistence call. Missing rows are `Ok(None)` / `Ok(false)`, never errors.
pub type RepoResult<T> = Result<T, sqlx::Error>;

/// Repository Trait
///
/// The persistence contract for posts and categories. Services depend only on this trait,
/// so the PostgreSQL store can be swapped for the in-memory one in tests.
///
/// **Send + Sync + async_trait** are required to share the trait object
/// (`Arc<dyn Repository>`) across Axum's request tasks.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Categories ---
    async fn create_category(&self, draft: CategoryDraft) -> RepoResult<Category>;
    async fn get_category(&self, id: i64) -> RepoResult<Option<Category>>;
    // Ordered by id.
    async fn list_categories(&self) -> RepoResult<Vec<Category>>;
    // Full replace of the mutable fields. `None` when the id does not exist.
    async fn update_category(&self, id: i64, draft: CategoryDraft)
    -> RepoResult<Option<Category>>;
    // `true` if a row was removed.
    async fn delete_category(&self, id: i64) -> RepoResult<bool>;
    async fn count_posts_in_category(&self, category_id: i64) -> RepoResult<i64>;

    // --- Posts ---
    async fn create_post(&self, draft: PostDraft) -> RepoResult<Post>;
    async fn get_post(&self, id: i64) -> RepoResult<Option<Post>>;
    /// One page of posts ordered by `page.sort_by`, ties broken by id ascending.
    async fn list_posts(&self, page: PageRequest) -> RepoResult<Page<Post>>;
    // Ordered by id.
    async fn list_posts_by_category(&self, category_id: i64) -> RepoResult<Vec<Post>>;
    async fn update_post(&self, id: i64, draft: PostDraft) -> RepoResult<Option<Post>>;
    async fn delete_post(&self, id: i64) -> RepoResult<bool>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
