//! Error types for blobmirror-sync.

use std::path::PathBuf;

use thiserror::Error;

use blobmirror_core::CoreError;

/// Failures reported by an [`ObjectStore`](crate::ObjectStore) backend.
///
/// "Object not found" is not an error; lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A single remote operation failed.
    #[error("{op} '{key}' failed: {message}")]
    Backend {
        op: &'static str,
        key: String,
        message: String,
    },

    /// The client could not be constructed from the connection settings.
    #[error("cannot create storage client: {0}")]
    Client(String),
}

/// Errors that end a sync run. Per-file failures are recorded as outcomes
/// instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source entry could not be read while walking with `--sync`.
    #[error("cannot read source entry {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Two local files map to the same destination key.
    #[error("{first} and {second} both map to destination key '{key}'")]
    KeyCollision {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("listing remote objects under '{prefix}' failed: {source}")]
    List {
        prefix: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
