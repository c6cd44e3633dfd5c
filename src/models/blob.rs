use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blob metadata as persisted alongside the blob bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobRecord {
    /// Size of the stored bytes
    pub size: u64,
    /// Upload time (Unix milliseconds)
    pub uploaded_at_ms: i64,
    /// Content type served back to readers
    pub content_type: String,
}

impl BlobRecord {
    pub fn new(size: u64, uploaded_at: DateTime<Utc>, content_type: impl Into<String>) -> Self {
        Self {
            size,
            uploaded_at_ms: uploaded_at.timestamp_millis(),
            content_type: content_type.into(),
        }
    }

    /// Upload time, falling back to the epoch if the stored value is out of range
    pub fn uploaded_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.uploaded_at_ms).unwrap_or_default()
    }
}

/// A blob as reported by the store after a put or during enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub pathname: String,
    /// Public URL the blob can be fetched from
    pub url: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Blob bytes and the content type they were stored with
#[derive(Debug, Clone)]
pub struct BlobContent {
    pub content_type: String,
    pub data: Vec<u8>,
}
