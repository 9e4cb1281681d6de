use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use social_core::error::CoreError;
use social_core::validation::FieldErrors;
use social_db::StoreError;

/// Sanitized message for every 5xx response.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for storage
/// faults, and adds HTTP-specific variants. [`IntoResponse`] is the one place
/// where any of these becomes a status code and a
/// `{ "message": ..., "errors"?: ... }` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `social_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage failure from `social_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request could not be decoded (bad JSON, unknown field, bad path).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route matches the request path.
    #[error("No route for {0}")]
    RouteNotFound(String),

    /// The request did not complete within `REQUEST_TIMEOUT_SECS`.
    #[error("Request timed out")]
    RequestTimeout,

    /// An internal error with a human-readable message. Logged, never shown.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(store) => classify_store_error(store),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::RouteNotFound(path) => (
                StatusCode::NOT_FOUND,
                format!("No route for {path}"),
                None,
            ),
            AppError::RequestTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "Request timed out".to_string(),
                None,
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string(), None)
            }
        };

        let body = match errors {
            Some(errors) => json!({ "message": message, "errors": errors }),
            None => json!({ "message": message }),
        };

        (status, axum::Json(body)).into_response()
    }
}

type Classified = (StatusCode, String, Option<FieldErrors>);

fn classify_core_error(err: CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            format!("{entity} with id {id} not found"),
            None,
        ),
        CoreError::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation failed".to_string(),
            Some(errors),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
        CoreError::PreconditionFailed { entity, id, .. } => {
            (StatusCode::CONFLICT, edit_conflict_message(entity, id), None)
        }
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
    }
}

/// Classify a storage error into an HTTP status and message.
///
/// - `NotFound` maps to 404, as does a foreign key naming a missing row.
/// - Unique constraint violations map to 409 without naming the constraint.
/// - A failed version guard maps to 409 with its own message.
/// - Timeouts and everything else map to 500 with a sanitized message.
fn classify_store_error(err: StoreError) -> Classified {
    match err {
        StoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            format!("{entity} with id {id} not found"),
            None,
        ),
        StoreError::MissingReference(constraint) => {
            tracing::debug!(%constraint, "Missing referenced row");
            (
                StatusCode::NOT_FOUND,
                "Referenced resource not found".to_string(),
                None,
            )
        }
        StoreError::Conflict(detail) => {
            tracing::debug!(%detail, "Uniqueness conflict");
            (
                StatusCode::CONFLICT,
                "Resource already exists".to_string(),
                None,
            )
        }
        StoreError::PreconditionFailed { entity, id, .. } => {
            (StatusCode::CONFLICT, edit_conflict_message(entity, id), None)
        }
        other => {
            tracing::error!(error = %other, "Storage error");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string(), None)
        }
    }
}

fn edit_conflict_message(entity: &str, id: i64) -> String {
    format!("{entity} {id} was modified by another request; reload it and retry")
}
