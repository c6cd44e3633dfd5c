use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::models::StoredBlob;

/// One file as shown in the gallery listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListingEntry {
    /// Pathname doubles as a stable identifier
    pub id: String,
    pub url: String,
    pub filename: String,
    /// Human-readable size
    pub size: String,
    #[serde(rename = "sizeBytes")]
    pub size_bytes: u64,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub file_type: String,
}

impl From<StoredBlob> for FileListingEntry {
    fn from(blob: StoredBlob) -> Self {
        Self {
            filename: display_name(&blob.pathname),
            size: format_file_size(blob.size),
            size_bytes: blob.size,
            file_type: document_type(&blob.pathname).to_string(),
            uploaded_at: blob.uploaded_at,
            url: blob.url,
            id: blob.pathname,
        }
    }
}

/// Lower-cased extension of the last path segment
fn extension_of(pathname: &str) -> Option<String> {
    let file = pathname.rsplit('/').next().unwrap_or(pathname);
    file.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

/// File name shown to visitors: last path segment without the `{hex}-` token
pub fn display_name(pathname: &str) -> String {
    let file = pathname.rsplit('/').next().unwrap_or(pathname);

    let cleaned = match file.split_once('-') {
        Some((token, rest))
            if !token.is_empty()
                && token.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) =>
        {
            rest
        }
        _ => file,
    };

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Format bytes into human-readable string
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.2}KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2}MB", bytes as f64 / MB as f64)
    }
}

/// Document type label shown next to each file
pub fn document_type(pathname: &str) -> &'static str {
    match extension_of(pathname).as_deref() {
        Some("pbix") => "Power BI",
        Some("twbx") => "Tableau",
        Some("pdf") => "PDF",
        Some("png" | "jpg" | "jpeg") => "Image",
        Some("pptx") => "PowerPoint",
        Some("xlsx") => "Excel",
        Some("csv") => "CSV",
        _ => "Document",
    }
}

/// Content type a stored file is served with
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("csv") => "text/csv",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
