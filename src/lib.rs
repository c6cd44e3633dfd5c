//! Dashboard Gallery Server Library
//!
//! Admin-gated upload, listing and deletion of portfolio dashboard files.

pub mod admission;
pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod storage;

pub use admission::{AdmissionPolicy, RejectionKind, StorageKey, UploadCandidate};
pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};
pub use storage::{BlobStore, BlobStoreError, RedbBlobStore};

use std::sync::Arc;
use std::time::Duration;

use cache::ListingCache;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
    pub config: Config,
    pub policy: Arc<AdmissionPolicy>,
    pub listing_cache: Arc<ListingCache>,
}

impl AppState {
    /// Create a new AppState with the given blob store and configuration
    pub fn new(store: Arc<dyn BlobStore>, config: Config) -> Self {
        let policy = AdmissionPolicy::from_config(&config);
        let listing_cache = ListingCache::new(Duration::from_secs(config.list_cache_ttl_secs));
        Self {
            store,
            policy: Arc::new(policy),
            listing_cache: Arc::new(listing_cache),
            config,
        }
    }
}
