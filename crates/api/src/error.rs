use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use brieflink_core::error::CoreError;
use serde_json::json;

/// What a respondent sees for every access failure, whatever the cause.
pub const RESPONDENT_ACCESS_MESSAGE: &str = "Link not found or invalid";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain outcomes and adds HTTP-specific variants.
/// Renders as `{"error": <message>, "code": <code>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Missing or invalid owner session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    let status = match err {
        CoreError::AccessDenied => StatusCode::FORBIDDEN,
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::InvalidTransition { .. }
        | CoreError::AlreadySubmitted
        | CoreError::AlreadyResponded => StatusCode::CONFLICT,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Storage(_) | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match err {
        CoreError::AccessDenied => RESPONDENT_ACCESS_MESSAGE.to_string(),
        CoreError::NotFound { entity, id } => format!("{entity} with id {id} not found"),
        CoreError::Validation(msg) => msg.clone(),
        CoreError::Storage(msg) | CoreError::Internal(msg) => {
            tracing::error!(code = err.code(), error = %msg, "Request failed");
            "An internal error occurred".to_string()
        }
        other => other.to_string(),
    };

    (status, err.code(), message)
}
