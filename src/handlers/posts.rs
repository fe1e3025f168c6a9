use crate::{
    AppState,
    error::{AppResult, ErrorResponse},
    extract::{AppPath, AppQuery, ValidatedJson},
    models::{PostDto, PostResponse},
    pagination::{
        DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, DEFAULT_SORT_BY, DEFAULT_SORT_DIRECTION,
        PageRequest,
    },
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use utoipa::IntoParams;

// --- Query Structs ---

/// PageParams
///
/// Query parameters of `GET /api/v1/posts`. Every field is optional; omitted ones take the
/// defaults from `pagination`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index.
    #[serde(default = "default_page_no")]
    #[param(default = 0)]
    pub page_no: i64,
    #[serde(default = "default_page_size")]
    #[param(default = 10)]
    pub page_size: i64,
    /// Post property to order by, e.g. `id`, `title`, `createdAt`.
    #[serde(default = "default_sort_by")]
    #[param(default = "id")]
    pub sort_by: String,
    /// `desc` (any case) for descending; anything else ascends.
    #[serde(default = "default_sort_dir")]
    #[param(default = "asc")]
    pub sort_dir: String,
}

fn default_page_no() -> i64 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_by() -> String {
    DEFAULT_SORT_BY.to_string()
}

fn default_sort_dir() -> String {
    DEFAULT_SORT_DIRECTION.to_string()
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_no: default_page_no(),
            page_size: default_page_size(),
            sort_by: default_sort_by(),
            sort_dir: default_sort_dir(),
        }
    }
}

// --- Handlers ---

/// create_post
///
/// [Admin Route] Persists a new post under an existing category.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = PostDto,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let created = state.posts.create_post(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// get_all_post
///
/// [Public Route] Lists posts one page at a time. Asking for a page past the end returns an
/// empty `content`, not an error.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    params(PageParams),
    responses(
        (status = 200, description = "One page of posts", body = PostResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
pub async fn get_all_post(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<Json<PostResponse>> {
    let page = PageRequest::new(
        params.page_no,
        params.page_size,
        &params.sort_by,
        &params.sort_dir,
    )?;
    Ok(Json(state.posts.get_all_post(page).await?))
}

/// get_post_by_id_v1
///
/// [Public Route] Retrieves a single post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Found", body = PostDto),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn get_post_by_id_v1(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<PostDto>> {
    Ok(Json(state.posts.get_post_by_id(id).await?))
}

/// update_post
///
/// [Admin Route] Replaces every mutable field of a post.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostDto,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated", body = PostDto),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Post or category not found", body = ErrorResponse)
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    ValidatedJson(payload): ValidatedJson<PostDto>,
) -> AppResult<Json<PostDto>> {
    Ok(Json(state.posts.update_post(&payload, id).await?))
}

/// delete_post
///
/// [Admin Route] Removes a post and answers with a plain-text confirmation.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<&'static str> {
    state.posts.delete_post_by_id(id).await?;
    Ok("Post entity deleted successfully.")
}

/// get_post_by_category
///
/// [Public Route] Lists every post of one category, ordered by id. An existing category
/// without posts yields `[]`; an unknown category is a 404.
#[utoipa::path(
    get,
    path = "/api/v1/posts/category/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Posts of the category", body = [PostDto]),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_post_by_category(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i64>,
) -> AppResult<Json<Vec<PostDto>>> {
    Ok(Json(state.posts.get_posts_by_category_id(category_id).await?))
}
