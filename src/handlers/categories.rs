use crate::{
    AppState,
    error::{AppResult, ErrorResponse},
    extract::{AppPath, ValidatedJson},
    models::CategoryDto,
};
use axum::{Json, extract::State, http::StatusCode};

/// add_category
///
/// [Admin Route] Creates a category.
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    request_body = CategoryDto,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse)
    )
)]
pub async fn add_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    let saved = state.categories.add_category(&payload).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// get_category
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Found", body = CategoryDto),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<CategoryDto>> {
    Ok(Json(state.categories.get_category(id).await?))
}

/// get_categories
///
/// [Public Route] All categories, unpaged.
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses((status = 200, description = "All categories", body = [CategoryDto]))
)]
pub async fn get_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryDto>>> {
    Ok(Json(state.categories.get_all_categories().await?))
}

/// update_category
///
/// [Admin Route] Replaces name and description.
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryDto,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated", body = CategoryDto),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    ValidatedJson(payload): ValidatedJson<CategoryDto>,
) -> AppResult<Json<CategoryDto>> {
    Ok(Json(state.categories.update_category(&payload, id).await?))
}

/// delete_category
///
/// [Admin Route] Deletes a category that no post references any more.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category still has posts", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<&'static str> {
    state.categories.delete_category(id).await?;
    Ok("Category deleted successfully!")
}
