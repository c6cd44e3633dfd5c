use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::constants::STORAGE_PREFIX;
use crate::error::Result;
use crate::models::FileListingEntry;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct FileListResponse<'a> {
    pub files: &'a [FileListingEntry],
}

/// List uploaded dashboards, newest first
///
/// Served from the listing cache while it is fresh; otherwise the blob
/// store is enumerated and the cache refilled.
pub async fn list_files(State(state): State<AppState>) -> Result<Response> {
    let files = match state.listing_cache.get() {
        Some(files) => {
            tracing::debug!("Serving file listing from cache ({} files)", files.len());
            files
        }
        None => {
            let blobs = state.store.list(STORAGE_PREFIX).await?;

            let mut files: Vec<FileListingEntry> =
                blobs.into_iter().map(FileListingEntry::from).collect();
            files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

            tracing::debug!("Refreshed file listing ({} files)", files.len());
            state.listing_cache.store(files)
        }
    };

    let max_age = state.listing_cache.ttl().as_secs();
    let cache_control = format!("public, max-age={0}, s-maxage={0}", max_age);

    Ok((
        [(header::CACHE_CONTROL, cache_control)],
        Json(FileListResponse {
            files: files.as_slice(),
        }),
    )
        .into_response())
}
