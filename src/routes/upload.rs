use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::admission::UploadCandidate;
use crate::constants::MAX_PASSWORD_BYTES;
use crate::error::{AppError, Result};
use crate::models::listing::content_type_for;
use crate::routes::validate_origin;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub pathname: String,
    pub filename: String,
    pub size: u64,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

/// File part of the upload form
///
/// `size` counts every byte received. `data` is only filled while the file
/// stays within the size ceiling; an oversized file is counted and drained.
#[derive(Debug)]
struct UploadedFile {
    name: String,
    size: u64,
    data: Vec<u8>,
}

/// Fields of the upload form this route understands
#[derive(Debug, Default)]
struct UploadForm {
    password: Option<String>,
    file: Option<UploadedFile>,
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
}

/// Read the password field, giving up on values longer than any real password
///
/// An overlong value is drained and reported as absent, which the admission
/// check turns into `Unauthorized`.
async fn read_password(field: &mut Field<'_>) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let mut overflow = false;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if overflow || buf.len() + chunk.len() > MAX_PASSWORD_BYTES {
            overflow = true;
            continue;
        }
        buf.extend_from_slice(&chunk);
    }

    if overflow {
        tracing::warn!("Ignoring oversized password field");
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Read the file field, buffering at most `max_bytes` and counting the rest
async fn read_file(field: &mut Field<'_>, max_bytes: u64) -> Result<(u64, Vec<u8>)> {
    let mut size: u64 = 0;
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size = size.saturating_add(chunk.len() as u64);
        if size <= max_bytes {
            data.extend_from_slice(&chunk);
        } else if !data.is_empty() {
            data = Vec::new();
        }
    }

    Ok((size, data))
}

/// Read the `password` and `file` fields, ignoring anything else
///
/// The body is consumed whole whatever its size, so the admission check sees
/// the password before it judges the file. A file field without a file name,
/// or with an empty name and no bytes (what browsers send when nothing was
/// picked), counts as no file.
async fn read_upload_form(mut multipart: Multipart, max_bytes: u64) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);

        match field_name.as_deref() {
            Some("password") => {
                form.password = read_password(&mut field).await?;
            }
            Some("file") => {
                if form.file.is_some() {
                    tracing::warn!("Ignoring extra file field in upload form");
                    continue;
                }

                let file_name = field.file_name().map(str::to_string);
                let (size, data) = read_file(&mut field, max_bytes).await?;

                match file_name {
                    Some(name) if !(name.is_empty() && size == 0) => {
                        form.file = Some(UploadedFile { name, size, data });
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Upload a dashboard file
///
/// # Admission
/// 1. Origin must be allow-listed (when an allow-list is configured)
/// 2. Admin password must match
/// 3. A file must be present
/// 4. File must not exceed the size ceiling
/// 5. Extension must be allow-listed
///
/// Accepted files are stored under `dashboards/{date}/{token}-{name}`.
pub async fn upload_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    validate_origin(&headers, &state.config.allowed_origins)?;

    let form = read_upload_form(multipart, state.policy.max_file_size_bytes()).await?;

    let candidate = form
        .file
        .as_ref()
        .map(|f| UploadCandidate::new(f.name.clone(), f.size));

    let key = state
        .policy
        .admit(form.password.as_deref(), candidate.as_ref())
        .map_err(|kind| {
            tracing::warn!("Upload rejected: {:?}", kind);
            AppError::from(kind)
        })?;

    let file = form.file.ok_or(AppError::MissingFile)?;
    let content_type = content_type_for(key.sanitized_name());
    let stored = state
        .store
        .put(key.as_str(), content_type, file.data)
        .await?;

    tracing::info!(
        "Stored upload {} ({} bytes)",
        stored.pathname,
        stored.size
    );

    Ok(Json(UploadResponse {
        url: stored.url,
        pathname: stored.pathname,
        filename: key.sanitized_name().to_string(),
        size: stored.size,
        uploaded_at: stored.uploaded_at,
    }))
}
