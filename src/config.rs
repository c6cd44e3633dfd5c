use std::env;

use url::Url;

use crate::constants::{
    ALLOWED_EXTENSIONS, DEFAULT_ADMIN_PASSWORD_HASH, LIST_CACHE_TTL_SECS, MAX_FILE_SIZE_BYTES,
};
use crate::security::is_valid_digest;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    /// Base URL under which stored blobs are publicly reachable
    pub public_base_url: String,
    /// Delete requests must target a URL on this host (or a subdomain)
    pub trusted_blob_domain: String,
    /// Hex SHA-256 digest of the admin password
    pub admin_password_hash: String,
    /// Empty means any origin is accepted
    pub allowed_origins: Vec<String>,
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub list_cache_ttl_secs: u64,
    pub environment: String,
}

/// Split a comma-separated variable into trimmed, non-empty entries
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source
    fn from_lookup<F>(var: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port: u16 = var("SERVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            var("DATABASE_PATH").unwrap_or_else(|| "./data/gallery.redb".to_string());

        let public_base_url = var("BLOB_PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}/blob", server_port));
        let public_base_url = public_base_url.trim_end_matches('/').to_string();
        let base_host = Url::parse(&public_base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or("Invalid BLOB_PUBLIC_BASE_URL")?;

        let trusted_blob_domain = match var("BLOB_TRUSTED_DOMAIN") {
            Some(domain) if !domain.trim().is_empty() => domain.trim().to_string(),
            _ => base_host,
        };

        let admin_password_hash = match var("ADMIN_PASSWORD_HASH") {
            Some(hash) => hash.trim().to_ascii_lowercase(),
            None => {
                tracing::warn!("ADMIN_PASSWORD_HASH not set, using the legacy fallback digest");
                DEFAULT_ADMIN_PASSWORD_HASH.to_string()
            }
        };
        if !is_valid_digest(&admin_password_hash) {
            return Err("ADMIN_PASSWORD_HASH must be a SHA-256 hex digest (64 characters)".into());
        }

        let allowed_origins = parse_list(&var("ALLOWED_ORIGINS").unwrap_or_default());

        let max_file_size_bytes = var("MAX_FILE_SIZE_BYTES")
            .unwrap_or_else(|| MAX_FILE_SIZE_BYTES.to_string())
            .parse()
            .map_err(|_| "Invalid MAX_FILE_SIZE_BYTES")?;

        let allowed_extensions = match var("ALLOWED_EXTENSIONS") {
            Some(value) => parse_list(&value),
            None => ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        };
        if allowed_extensions.is_empty() {
            return Err("ALLOWED_EXTENSIONS must list at least one extension".into());
        }

        let list_cache_ttl_secs = var("LIST_CACHE_TTL_SECS")
            .unwrap_or_else(|| LIST_CACHE_TTL_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid LIST_CACHE_TTL_SECS")?;

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Config {
            server_host,
            server_port,
            database_path,
            public_base_url,
            trusted_blob_domain,
            admin_password_hash,
            allowed_origins,
            max_file_size_bytes,
            allowed_extensions,
            list_cache_ttl_secs,
            environment,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
