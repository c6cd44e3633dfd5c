use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use url::Url;

use crate::constants::TOKEN_BYTES;

// =============================================================================
// Admin Credential
// =============================================================================

/// Hash a credential with SHA-256 and return the lowercase hex digest
///
/// This is the format expected in `ADMIN_PASSWORD_HASH`.
pub fn hash_credential(credential: &str) -> String {
    hex::encode(Sha256::digest(credential.as_bytes()))
}

/// Check that a string looks like a SHA-256 hex digest (64 hex characters)
pub fn is_valid_digest(digest: &str) -> bool {
    digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit())
}

/// Verify a request credential against the configured digest
///
/// The credential is hashed and the two digests are compared in constant
/// time, so neither the secret nor its length leaks through timing.
/// A missing or empty credential never matches.
///
/// # Arguments
/// * `credential` - The password supplied with the request, if any
/// * `expected_digest` - Hex-encoded SHA-256 digest of the admin password
pub fn verify_credential(credential: Option<&str>, expected_digest: &str) -> bool {
    let credential = match credential {
        Some(c) if !c.is_empty() => c,
        _ => return false,
    };

    let expected = match hex::decode(expected_digest) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::error!("Configured admin password digest is not valid hex");
            return false;
        }
    };

    let digest = Sha256::digest(credential.as_bytes());
    digest.as_slice().ct_eq(expected.as_slice()).into()
}

// =============================================================================
// Storage Key Token
// =============================================================================

/// Generate a random lowercase hex token from the OS random source
///
/// Used only to keep same-named uploads on the same day apart.
pub fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// =============================================================================
// Request Origin & Delete Target
// =============================================================================

/// Check a request `Origin` header value against the configured allow-list
///
/// An empty allow-list accepts every origin. Entries match exactly,
/// ignoring a trailing slash on either side.
pub fn is_origin_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    if allowed_origins.is_empty() {
        return true;
    }

    let origin = origin.trim().trim_end_matches('/');
    allowed_origins
        .iter()
        .any(|allowed| allowed.trim().trim_end_matches('/') == origin)
}

/// Check that a URL points into the blob store before deleting through it
///
/// The URL must parse, use http(s), and its host must be `trusted_domain`
/// or a subdomain of it.
pub fn is_trusted_blob_url(url: &str, trusted_domain: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => {
            tracing::warn!("Rejecting unparsable blob URL");
            return false;
        }
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    let host = match parsed.host_str() {
        Some(h) => h.to_ascii_lowercase(),
        None => return false,
    };
    let trusted = trusted_domain.trim().trim_start_matches('.').to_ascii_lowercase();
    if trusted.is_empty() {
        return false;
    }

    host == trusted || host.ends_with(&format!(".{}", trusted))
}
