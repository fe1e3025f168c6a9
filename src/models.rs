use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::Validate;

// --- Core Entities (Mapped to Database) ---

/// Category
///
/// A row of the `categories` table. Posts reference it through `posts.category_id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Post
///
/// A row of the `posts` table. The timestamps are maintained by the database and are
/// not part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Default)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub content: String,
    // FK to categories.id, always set.
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Persistence Inputs ---

/// Mutable fields of a post, used for both inserts and full-replace updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_id: i64,
}

/// Mutable fields of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

// --- Wire Schemas ---

/// PostDto
///
/// Request and response representation of a post. On requests `id` may be omitted and is
/// ignored; the server always assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostDto {
    #[serde(default)]
    #[ts(type = "number")]
    pub id: i64,

    #[validate(length(min = 2, message = "Post title should have at least 2 characters"))]
    #[schema(example = "Getting started with Rust")]
    pub title: String,

    #[validate(length(
        min = 10,
        message = "Post description should have at least 10 characters"
    ))]
    #[schema(example = "A short tour of ownership and borrowing")]
    pub description: String,

    #[validate(length(min = 1, message = "Post content should not be empty"))]
    pub content: String,

    #[ts(type = "number")]
    #[schema(example = 1)]
    pub category_id: i64,
}

impl PostDto {
    /// Copies the client-controlled fields into a persistence input.
    pub fn to_draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            category_id: self.category_id,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        PostDto {
            id: post.id,
            title: post.title,
            description: post.description,
            content: post.content,
            category_id: post.category_id,
        }
    }
}

/// CategoryDto
///
/// Request and response representation of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema, TS, Default)]
#[ts(export)]
pub struct CategoryDto {
    #[serde(default)]
    #[ts(type = "number")]
    pub id: i64,

    #[validate(length(min = 1, message = "Category name should not be empty"))]
    #[schema(example = "Tech")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Tech posts")]
    pub description: String,
}

impl CategoryDto {
    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        CategoryDto {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

/// PostResponse
///
/// Page envelope returned by `GET /api/v1/posts`. `content` is empty when `pageNo` is past
/// the last page; that is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostResponse {
    pub content: Vec<PostDto>,
    #[ts(type = "number")]
    pub page_no: i64,
    #[ts(type = "number")]
    pub page_size: i64,
    #[ts(type = "number")]
    pub total_elements: i64,
    #[ts(type = "number")]
    pub total_pages: i64,
    /// True when no page follows this one.
    pub last: bool,
}
