use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Reporting endpoint returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Cache error: {0}")]
    Cache(#[from] csv::Error),

    #[error("Cache file is missing columns: {}", .0.join(", "))]
    CacheColumns(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Transport failures and 5xx responses may succeed on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Transport(_) => true,
            AppError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            e @ (AppError::Transport(_)
            | AppError::Status { .. }
            | AppError::Decode(_)
            | AppError::Schema(_)) => {
                error!("upstream error: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
            e => {
                error!("internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
