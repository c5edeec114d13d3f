//! Run configuration.
//!
//! Everything the engine needs is carried in [`SyncConfig`]; nothing below
//! the CLI reads process state.

use std::fmt;
use std::path::PathBuf;

use crate::error::CoreError;
use crate::types::normalize_prefix;

/// Conventional static-website container name.
pub const DEFAULT_CONTAINER: &str = "$web";

/// Environment variable holding the storage connection string.
pub const CONNECTION_STRING_ENV: &str = "CONNECTION_STRING";

/// Configuration for a single mirror run.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Local root directory to read.
    pub source: PathBuf,
    /// Destination prefix inside the container, leading slashes stripped.
    pub dest_prefix: String,
    pub container: String,
    /// Delete remote objects under the prefix that were not produced locally.
    pub sync: bool,
    /// Report decisions without uploading or deleting anything.
    pub dry_run: bool,
    pub connection_string: String,
}

impl SyncConfig {
    /// Build a configuration with default container and flags off.
    pub fn new(
        source: impl Into<PathBuf>,
        dest: &str,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            dest_prefix: normalize_prefix(dest),
            container: DEFAULT_CONTAINER.to_owned(),
            sync: false,
            dry_run: false,
            connection_string: connection_string.into(),
        }
    }

    /// Check the parts of the configuration that can fail before any I/O
    /// against the remote store.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.connection_string.trim().is_empty() {
            return Err(CoreError::MissingCredential {
                var: CONNECTION_STRING_ENV,
            });
        }
        if self.container.is_empty() {
            return Err(CoreError::EmptyContainer);
        }
        if !self.source.is_dir() {
            return Err(CoreError::SourceNotDirectory {
                path: self.source.clone(),
            });
        }
        Ok(())
    }
}

// Keep the credential out of logs.
impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("source", &self.source)
            .field("dest_prefix", &self.dest_prefix)
            .field("container", &self.container)
            .field("sync", &self.sync)
            .field("dry_run", &self.dry_run)
            .field("connection_string", &"<redacted>")
            .finish()
    }
}

/// Read the connection string through `lookup` (normally `std::env::var`).
///
/// Unset and empty values are both treated as missing.
pub fn connection_string_from<F>(lookup: F) -> Result<String, CoreError>
where
    F: FnOnce(&str) -> Option<String>,
{
    match lookup(CONNECTION_STRING_ENV) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CoreError::MissingCredential {
            var: CONNECTION_STRING_ENV,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_applies_defaults_and_strips_leading_slash() {
        let cfg = SyncConfig::new("/srv/site", "/blog", "conn");
        assert_eq!(cfg.dest_prefix, "blog");
        assert_eq!(cfg.container, "$web");
        assert!(!cfg.sync);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn validate_accepts_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let cfg = SyncConfig::new(tmp.path(), "site", "conn");
        cfg.validate().expect("valid config");
    }

    #[test]
    fn validate_rejects_missing_source() {
        let tmp = TempDir::new().unwrap();
        let cfg = SyncConfig::new(tmp.path().join("nope"), "site", "conn");
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, CoreError::SourceNotDirectory { .. }), "got: {err}");
    }

    #[test]
    fn validate_rejects_blank_credential_first() {
        let cfg = SyncConfig::new("/definitely/missing", "site", "  ");
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, CoreError::MissingCredential { .. }), "got: {err}");
    }

    #[test]
    fn validate_rejects_empty_container() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = SyncConfig::new(tmp.path(), "site", "conn");
        cfg.container.clear();
        assert!(matches!(cfg.validate(), Err(CoreError::EmptyContainer)));
    }

    #[test]
    fn connection_string_lookup() {
        assert_eq!(
            connection_string_from(|_| Some("AccountName=x".into())).unwrap(),
            "AccountName=x"
        );
        let err = connection_string_from(|_| None).unwrap_err();
        assert!(err.to_string().contains("CONNECTION_STRING"));
        assert!(connection_string_from(|_| Some(String::new())).is_err());
    }

    #[test]
    fn debug_output_redacts_credential() {
        let cfg = SyncConfig::new("/srv", "site", "AccountKey=secret");
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
