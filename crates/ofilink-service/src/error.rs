//! Error types for ofilink-service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ofilink_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Service-level errors raised while starting up
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup or runtime error
    #[error("Server error: {0}")]
    Server(String),

    /// Data file could not be prepared
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API errors; each maps to one response status
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Malformed request
    #[error("{0}")]
    BadRequest(String),

    /// Store failure, including missing required fields
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub message: String,
}

const INTERNAL_MESSAGE: &str = "internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Store(StoreError::Validation(err)) => {
                tracing::warn!(error = %err, "rejected create request");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                ok: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
