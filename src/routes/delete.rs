use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::constants::ERR_MISSING_URL;
use crate::error::{AppError, Result};
use crate::routes::validate_origin;
use crate::security::is_trusted_blob_url;
use crate::storage::BlobStoreError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteFileRequest {
    pub url: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteFileResponse {
    pub success: bool,
}

/// Delete an uploaded file by its public URL
///
/// # Security
/// - Origin must be allow-listed (when an allow-list is configured)
/// - Requires the admin password
/// - The URL must point at the blob store domain; anything else is refused
///   before the store is called
pub async fn delete_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DeleteFileRequest>,
) -> Result<Json<DeleteFileResponse>> {
    validate_origin(&headers, &state.config.allowed_origins)?;

    state
        .policy
        .authorize(payload.password.as_deref())
        .map_err(|kind| {
            tracing::warn!("Delete rejected: {:?}", kind);
            AppError::from(kind)
        })?;

    let url = payload
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::InvalidInput(ERR_MISSING_URL.to_string()))?;

    if !is_trusted_blob_url(url, &state.config.trusted_blob_domain) {
        tracing::warn!("Delete rejected: URL outside blob storage");
        return Err(AppError::InvalidTarget);
    }

    match state.store.delete(url).await {
        Ok(()) => {}
        Err(BlobStoreError::ForeignUrl(_)) => {
            tracing::warn!("Delete rejected: URL not served by blob store");
            return Err(AppError::InvalidTarget);
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Deleted file {}", url);

    Ok(Json(DeleteFileResponse { success: true }))
}
