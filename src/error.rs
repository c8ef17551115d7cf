//! HTTP error handling

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

/// Request-level failures surfaced to the caller.
///
/// There is no finer taxonomy: any failure during a scan fails the whole
/// request with a JSON error body.
#[derive(Debug)]
pub enum AppError {
    /// The queue could not be reached or the read failed.
    Queue(String),
    /// A buffered entry or field value could not be parsed.
    MalformedRecord(String),
    /// Anything else.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Queue(msg) => {
                tracing::error!("queue error: {}", msg);
                (StatusCode::BAD_GATEWAY, "log queue unavailable")
            }
            AppError::MalformedRecord(msg) => {
                tracing::error!("malformed record: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "malformed log record")
            }
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Queue(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedRecord(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}
