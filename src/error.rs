use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// AppError
///
/// The single error type surfaced by services and handlers. Every variant maps to exactly
/// one HTTP status, and all of them render as an `ErrorResponse` JSON body.
#[derive(Debug, Error)]
pub enum AppError {
    /// DTO rule violations collected by `validator`.
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// Malformed JSON, path segments, query strings or paging parameters.
    #[error("{0}")]
    BadRequest(String),

    #[error("Full authentication is required to access this resource")]
    Unauthorized,

    #[error("Access denied: ADMIN role required")]
    Forbidden,

    #[error("{resource} not found with {field} : '{value}'")]
    NotFound {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Conflict(String),

    /// Any storage failure not covered above. The details are logged, never returned.
    #[error("Database error")]
    Database(#[source] sqlx::Error),
}

/// Convenience alias used by the service and handler layers.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Builds the canonical "not found by id" error, e.g. `Post not found with id : '5'`.
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        AppError::NotFound {
            resource,
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // Insert/update racing a category delete, or a delete racing an insert.
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                tracing::warn!(error = %db_err, "foreign key violation");
                AppError::Conflict(
                    "The referenced category does not exist or is still in use".to_string(),
                )
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// ErrorResponse
///
/// Wire format of every non-2xx response produced by this service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ErrorResponse {
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    /// Reason phrase of `status`, e.g. "Not Found".
    pub error: String,
    pub message: String,
    /// Field name → message, only present for validation failures.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let message = field_errors
                .iter()
                .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .collect::<Vec<_>>()
                .join("; ");
            let message = if message.is_empty() {
                "invalid value".to_string()
            } else {
                message
            };
            (field.to_string(), message)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let errors = match &self {
            AppError::Validation(validation) => field_messages(validation),
            _ => BTreeMap::new(),
        };

        let message = match &self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "database operation failed");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
