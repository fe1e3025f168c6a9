//! Business logic between the HTTP handlers and the repository: DTO mapping, existence
//! checks and not-found errors.

mod category;
mod post;

pub use category::CategoryService;
pub use post::PostService;
