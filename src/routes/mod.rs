//! Router Module Index
//!
//! Splits the HTTP surface by access level. Both routers use the same paths; `create_router`
//! merges them so each path carries its public reads next to its guarded writes.

/// Read-only routes, open to anonymous clients.
pub mod public;

/// Mutating routes, every one wrapped in the `require_admin` route layer.
pub mod admin;
