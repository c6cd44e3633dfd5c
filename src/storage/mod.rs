//! Blob storage collaborator
//!
//! Upload, listing and delete routes only talk to storage through the
//! [`BlobStore`] trait. The bundled backend keeps blobs in redb.

pub mod redb_store;

pub use redb_store::RedbBlobStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{BlobContent, StoredBlob};

/// Blob store operation errors
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::error::EncodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bincode::error::DecodeError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Blob already exists: {0}")]
    AlreadyExists(String),

    #[error("URL is not served by this store: {0}")]
    ForeignUrl(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for blob store operations
pub type StoreResult<T> = std::result::Result<T, BlobStoreError>;

/// Managed blob storage
///
/// Calls may fail or take arbitrarily long; callers neither retry nor time
/// them out.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under a new pathname and return its public description
    ///
    /// Pathnames are write-once: storing over an existing one fails.
    async fn put(&self, pathname: &str, content_type: &str, data: Vec<u8>)
        -> StoreResult<StoredBlob>;

    /// Enumerate every blob whose pathname starts with `prefix`
    async fn list(&self, prefix: &str) -> StoreResult<Vec<StoredBlob>>;

    /// Fetch blob bytes by pathname
    async fn get(&self, pathname: &str) -> StoreResult<Option<BlobContent>>;

    /// Delete the blob behind a public URL; deleting a missing blob succeeds
    async fn delete(&self, url: &str) -> StoreResult<()>;

    /// Check the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
