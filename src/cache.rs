//! Single-slot listing cache
//!
//! Holds the last successful file listing for a fixed freshness window.
//! Entries expire by time only; uploads and deletes do not invalidate them,
//! so readers may see a stale listing for up to one window. Concurrent
//! refreshes may both hit the store; the last write wins.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::models::FileListingEntry;

#[derive(Debug)]
struct CachedListing {
    fetched_at: Instant,
    files: Arc<Vec<FileListingEntry>>,
}

/// Process-wide cache of the most recent file listing
#[derive(Debug)]
pub struct ListingCache {
    ttl: Duration,
    slot: RwLock<Option<CachedListing>>,
}

impl ListingCache {
    /// Create an empty cache with the given freshness window
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached listing, if one was stored less than `ttl` ago
    pub fn get(&self) -> Option<Arc<Vec<FileListingEntry>>> {
        self.get_at(Instant::now())
    }

    fn get_at(&self, now: Instant) -> Option<Arc<Vec<FileListingEntry>>> {
        // The slot only ever holds a complete value, so a poisoned lock is still usable
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|cached| now.saturating_duration_since(cached.fetched_at) < self.ttl)
            .map(|cached| Arc::clone(&cached.files))
    }

    /// Replace the cached listing wholesale and return the shared copy
    pub fn store(&self, files: Vec<FileListingEntry>) -> Arc<Vec<FileListingEntry>> {
        let files = Arc::new(files);
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(CachedListing {
            fetched_at: Instant::now(),
            files: Arc::clone(&files),
        });
        files
    }
}
