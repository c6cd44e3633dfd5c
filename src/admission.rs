//! Upload admission and storage key naming
//!
//! Decides whether an inbound (password, file) pair may be stored and, if so,
//! derives the write-once key it is stored under:
//! `dashboards/{YYYY-MM-DD}/{token}-{sanitized_name}`.

use std::fmt;

use chrono::{NaiveDate, Utc};

use crate::config::Config;
use crate::constants::STORAGE_PREFIX;
use crate::security::{generate_token, verify_credential};

/// A file received by the upload route, before it is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    /// File name as sent by the client (untrusted)
    pub original_name: String,
    /// Payload size in bytes
    pub byte_size: u64,
}

impl UploadCandidate {
    pub fn new(original_name: impl Into<String>, byte_size: u64) -> Self {
        Self {
            original_name: original_name.into(),
            byte_size,
        }
    }

    /// Lower-cased suffix after the final `.`, if there is one
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.original_name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

/// Why an upload was refused
///
/// Variants are listed in the order the checks run; the first failing
/// check decides the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionKind {
    /// Password missing or wrong
    Unauthorized,
    /// No file payload in the request
    MissingFile,
    /// File is larger than the configured ceiling
    TooLarge { max_bytes: u64 },
    /// Extension missing or not allow-listed
    UnsupportedType { allowed: Vec<String> },
}

/// Canonical, write-once path of an accepted upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey {
    path: String,
    sanitized_name: String,
}

impl StorageKey {
    fn compose(date: NaiveDate, token: &str, sanitized_name: String) -> Self {
        let path = format!(
            "{}{}/{}-{}",
            STORAGE_PREFIX,
            date.format("%Y-%m-%d"),
            token,
            sanitized_name
        );
        Self {
            path,
            sanitized_name,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// The file name component, after sanitization
    pub fn sanitized_name(&self) -> &str {
        &self.sanitized_name
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Upload admission rules
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    password_digest: String,
    max_file_size_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl AdmissionPolicy {
    pub fn new(
        password_digest: impl Into<String>,
        max_file_size_bytes: u64,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            password_digest: password_digest.into(),
            max_file_size_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.admin_password_hash.clone(),
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
        )
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Check the password alone (used by routes that take no file)
    pub fn authorize(&self, credential: Option<&str>) -> Result<(), RejectionKind> {
        if verify_credential(credential, &self.password_digest) {
            Ok(())
        } else {
            Err(RejectionKind::Unauthorized)
        }
    }

    /// Decide whether an upload is accepted, keyed by today's UTC date
    pub fn admit(
        &self,
        credential: Option<&str>,
        candidate: Option<&UploadCandidate>,
    ) -> Result<StorageKey, RejectionKind> {
        self.admit_on(credential, candidate, Utc::now().date_naive())
    }

    /// Decide whether an upload is accepted, keyed by the given date
    ///
    /// Checks run in a fixed order: password, presence, size, extension.
    /// A wrong password is always reported as such, whatever the file.
    pub fn admit_on(
        &self,
        credential: Option<&str>,
        candidate: Option<&UploadCandidate>,
        date: NaiveDate,
    ) -> Result<StorageKey, RejectionKind> {
        self.authorize(credential)?;

        let candidate = candidate.ok_or(RejectionKind::MissingFile)?;

        if candidate.byte_size > self.max_file_size_bytes {
            return Err(RejectionKind::TooLarge {
                max_bytes: self.max_file_size_bytes,
            });
        }

        match candidate.extension() {
            Some(ext) if self.allowed_extensions.contains(&ext) => {}
            _ => {
                return Err(RejectionKind::UnsupportedType {
                    allowed: self.allowed_extensions.clone(),
                })
            }
        }

        let sanitized = sanitize_file_name(&candidate.original_name);
        Ok(StorageKey::compose(date, &generate_token(), sanitized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ALLOWED_EXTENSIONS, MAX_FILE_SIZE_BYTES, TOKEN_BYTES};
    use crate::security::hash_credential;

    const PASSWORD: &str = "aditya2025";
    const MIB: u64 = 1024 * 1024;

    fn policy() -> AdmissionPolicy {
        AdmissionPolicy::new(
            hash_credential(PASSWORD),
            MAX_FILE_SIZE_BYTES,
            ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    /// Split `dashboards/{date}/{token}-{name}` into its parts
    fn parts(key: &StorageKey) -> (String, String, String) {
        let rest = key.as_str().strip_prefix(STORAGE_PREFIX).unwrap();
        let (date, file) = rest.split_once('/').unwrap();
        let (token, name) = file.split_once('-').unwrap();
        (date.to_string(), token.to_string(), name.to_string())
    }

    // -------------------------------------------------------------------------
    // Extension & Sanitization
    // -------------------------------------------------------------------------

    #[test]
    fn test_extension_lowercased_after_last_dot() {
        assert_eq!(
            UploadCandidate::new("Report.Final.PDF", 1).extension(),
            Some("pdf".to_string())
        );
        assert_eq!(
            UploadCandidate::new("archive.tar.gz", 1).extension(),
            Some("gz".to_string())
        );
    }

    #[test]
    fn test_extension_absent() {
        assert_eq!(UploadCandidate::new("README", 1).extension(), None);
        assert_eq!(UploadCandidate::new("trailing.", 1).extension(), None);
        assert_eq!(UploadCandidate::new("", 1).extension(), None);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Report 2024!.pdf"), "Report_2024_.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name("données.csv"), "donn_es.csv");
        assert_eq!(sanitize_file_name("ok-name_1.xlsx"), "ok-name_1.xlsx");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in ["Report 2024!.pdf", "a b/c\\d.png", "ünï cødé.jpg", ""] {
            let once = sanitize_file_name(name);
            assert_eq!(sanitize_file_name(&once), once);
        }
    }

    // -------------------------------------------------------------------------
    // Admission Ordering
    // -------------------------------------------------------------------------

    #[test]
    fn test_admit_accepts_valid_upload() {
        let candidate = UploadCandidate::new("Report 2024!.pdf", 2 * MIB);
        let key = policy()
            .admit_on(Some(PASSWORD), Some(&candidate), day())
            .unwrap();

        let (date, token, name) = parts(&key);
        assert_eq!(date, "2025-06-01");
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(name, "Report_2024_.pdf");
        assert_eq!(key.sanitized_name(), "Report_2024_.pdf");
        assert_eq!(key.to_string(), key.as_str());
    }

    #[test]
    fn test_admit_wrong_password_always_unauthorized() {
        let p = policy();
        let candidates = [
            Some(UploadCandidate::new("fine.pdf", 10)),
            Some(UploadCandidate::new("malware.exe", 10)),
            Some(UploadCandidate::new("big.pdf", 200 * MIB)),
            None,
        ];

        for credential in [Some("wrong"), Some(""), None] {
            for candidate in &candidates {
                assert_eq!(
                    p.admit_on(credential, candidate.as_ref(), day()),
                    Err(RejectionKind::Unauthorized)
                );
            }
        }
    }

    #[test]
    fn test_admit_missing_file() {
        assert_eq!(
            policy().admit_on(Some(PASSWORD), None, day()),
            Err(RejectionKind::MissingFile)
        );
    }

    #[test]
    fn test_admit_too_large_checked_before_extension() {
        let p = policy();
        let big_pdf = UploadCandidate::new("big.pdf", 200 * MIB);
        let big_exe = UploadCandidate::new("big.exe", 200 * MIB);

        for candidate in [&big_pdf, &big_exe] {
            assert_eq!(
                p.admit_on(Some(PASSWORD), Some(candidate), day()),
                Err(RejectionKind::TooLarge {
                    max_bytes: MAX_FILE_SIZE_BYTES
                })
            );
        }
    }

    #[test]
    fn test_admit_size_at_ceiling_is_allowed() {
        let candidate = UploadCandidate::new("exact.pdf", MAX_FILE_SIZE_BYTES);
        assert!(policy()
            .admit_on(Some(PASSWORD), Some(&candidate), day())
            .is_ok());
    }

    #[test]
    fn test_admit_unsupported_type() {
        let p = policy();
        for name in ["malware.exe", "noextension", "trailing.", "pdf"] {
            let candidate = UploadCandidate::new(name, 10);
            match p.admit_on(Some(PASSWORD), Some(&candidate), day()) {
                Err(RejectionKind::UnsupportedType { allowed }) => {
                    assert!(allowed.contains(&"pdf".to_string()));
                }
                other => panic!("expected UnsupportedType for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_admit_uppercase_extension_allowed() {
        let candidate = UploadCandidate::new("Chart.PNG", 10);
        let key = policy()
            .admit_on(Some(PASSWORD), Some(&candidate), day())
            .unwrap();
        assert!(key.as_str().ends_with("-Chart.PNG"));
    }

    #[test]
    fn test_admit_same_name_same_day_differs() {
        let p = policy();
        let candidate = UploadCandidate::new("Report.pdf", 10);
        let first = p.admit_on(Some(PASSWORD), Some(&candidate), day()).unwrap();
        let second = p.admit_on(Some(PASSWORD), Some(&candidate), day()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_admit_uses_current_date() {
        let candidate = UploadCandidate::new("today.csv", 10);
        let key = policy().admit(Some(PASSWORD), Some(&candidate)).unwrap();
        let (date, _, _) = parts(&key);
        assert!(NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_policy_normalizes_allow_list() {
        let p = AdmissionPolicy::new(
            hash_credential(PASSWORD),
            10,
            vec![" .PDF ".to_string(), "".to_string(), "csv".to_string()],
        );
        assert_eq!(p.allowed_extensions(), &["pdf".to_string(), "csv".to_string()]);
    }
}
