use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{AppError, Result};
use crate::AppState;

/// Stored blobs never change, so readers may cache them indefinitely
const BLOB_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Serve a stored blob at its public URL
pub async fn serve_blob(
    State(state): State<AppState>,
    Path(pathname): Path<String>,
) -> Result<Response> {
    let content = state
        .store
        .get(&pathname)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok((
        [
            (header::CONTENT_TYPE, content.content_type),
            (header::CACHE_CONTROL, BLOB_CACHE_CONTROL.to_string()),
        ],
        content.data,
    )
        .into_response())
}
