//! Error types for blobmirror-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building configuration or mapping local paths.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The credential environment variable is unset or empty.
    #[error("environment variable {var} is required but not set")]
    MissingCredential { var: &'static str },

    /// SOURCE does not exist or is not a directory.
    #[error("source {path} is not a directory")]
    SourceNotDirectory { path: PathBuf },

    #[error("container name must not be empty")]
    EmptyContainer,

    /// A walked file did not live under the source root.
    #[error("{path} is not inside source {root}")]
    OutsideSource { path: PathBuf, root: PathBuf },
}
