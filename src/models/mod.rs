pub mod blob;
pub mod listing;

pub use blob::{BlobContent, BlobRecord, StoredBlob};
pub use listing::FileListingEntry;
