//! blobmirror core library: destination keys, fingerprints, content types,
//! run configuration and errors.
//!
//! - [`types`]: newtypes shared by the sync engine and its backends
//! - [`content_type`]: extension → MIME lookup with static-site overrides
//! - [`config`]: [`SyncConfig`], the explicit configuration for one run
//! - [`error`]: [`CoreError`]

pub mod config;
pub mod content_type;
pub mod error;
pub mod types;

pub use config::SyncConfig;
pub use error::CoreError;
pub use types::{DestinationKey, Fingerprint, KeepSet};
