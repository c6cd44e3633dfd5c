use axum::http::{header::ORIGIN, HeaderMap};

use crate::admission::RejectionKind;
use crate::error::AppError;
use crate::security::is_origin_allowed;

impl From<RejectionKind> for AppError {
    fn from(kind: RejectionKind) -> Self {
        match kind {
            RejectionKind::Unauthorized => AppError::Unauthorized,
            RejectionKind::MissingFile => AppError::MissingFile,
            RejectionKind::TooLarge { max_bytes } => AppError::TooLarge { max_bytes },
            RejectionKind::UnsupportedType { allowed } => AppError::UnsupportedType { allowed },
        }
    }
}

/// Reject requests whose `Origin` header is not allow-listed
///
/// Requests without an `Origin` header (same-origin navigation, curl) pass.
pub fn validate_origin(headers: &HeaderMap, allowed_origins: &[String]) -> Result<(), AppError> {
    let origin = match headers.get(ORIGIN) {
        Some(value) => value.to_str().map_err(|_| AppError::ForbiddenOrigin)?,
        None => return Ok(()),
    };

    if !is_origin_allowed(origin, allowed_origins) {
        tracing::warn!("Request from disallowed origin: {}", origin);
        return Err(AppError::ForbiddenOrigin);
    }

    Ok(())
}
