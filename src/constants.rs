/// Maximum upload size in bytes (100MB)
pub const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Longest password field the upload form will buffer
pub const MAX_PASSWORD_BYTES: usize = 4096;

/// File extensions accepted for upload (lower case)
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "pbix", "twbx", "png", "jpg", "jpeg", "pptx", "xlsx", "csv",
];

/// Prefix under which every uploaded dashboard is stored
pub const STORAGE_PREFIX: &str = "dashboards/";

/// Number of random bytes in the storage key token (hex encoded: 8 chars)
pub const TOKEN_BYTES: usize = 4;

/// How long a file listing stays fresh (5 minutes)
pub const LIST_CACHE_TTL_SECS: u64 = 300;

/// Fallback admin password digest used when ADMIN_PASSWORD_HASH is unset
///
/// Carried over from the legacy deployment; its password is not known, so
/// a real deployment has to set ADMIN_PASSWORD_HASH to log in at all.
pub const DEFAULT_ADMIN_PASSWORD_HASH: &str =
    "9b74c9897bac770ffc029102cf27b630fc1a40d5a01416e8946a534180c7ccbb";

/// Content type used when the extension is unknown
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for a bad or missing admin password
pub const ERR_UNAUTHORIZED: &str = "Invalid credentials. Access denied.";

/// Error message when the multipart form carries no file
pub const ERR_MISSING_FILE: &str = "No file provided";

/// Error message for a missing delete target
pub const ERR_MISSING_URL: &str = "Invalid URL provided";

/// Error message for a delete target outside the blob store domain
pub const ERR_INVALID_TARGET: &str = "Invalid file URL";

/// Error message for a request from an origin that is not allow-listed
pub const ERR_FORBIDDEN_ORIGIN: &str = "CORS policy violation";

/// Error message for any blob store failure
pub const ERR_STORAGE_UNAVAILABLE: &str = "Storage service unavailable";
