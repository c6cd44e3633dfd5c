use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::{
    ERR_FORBIDDEN_ORIGIN, ERR_INVALID_TARGET, ERR_MISSING_FILE, ERR_STORAGE_UNAVAILABLE,
    ERR_UNAUTHORIZED,
};
use crate::models::listing::format_file_size;
use crate::storage::BlobStoreError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Missing file")]
    MissingFile,

    #[error("File too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },

    #[error("Unsupported file type")]
    UnsupportedType { allowed: Vec<String> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Delete target outside blob storage")]
    InvalidTarget,

    #[error("Origin not allowed")]
    ForbiddenOrigin,

    #[error("File not found")]
    NotFound,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] BlobStoreError),
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ERR_UNAUTHORIZED.to_string()),
            AppError::MissingFile => (StatusCode::BAD_REQUEST, ERR_MISSING_FILE.to_string()),
            AppError::TooLarge { max_bytes } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File size exceeds {} limit", format_file_size(max_bytes)),
            ),
            AppError::UnsupportedType { ref allowed } => (
                StatusCode::BAD_REQUEST,
                format!("File type not allowed. Allowed types: {}", allowed.join(", ")),
            ),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidTarget => (StatusCode::FORBIDDEN, ERR_INVALID_TARGET.to_string()),
            AppError::ForbiddenOrigin => {
                (StatusCode::FORBIDDEN, ERR_FORBIDDEN_ORIGIN.to_string())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "File not found".to_string()),
            AppError::StorageUnavailable(ref e) => {
                tracing::error!("Blob store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ERR_STORAGE_UNAVAILABLE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
