//! Object-store capability used by the engine.
//!
//! The engine never talks to a storage SDK directly; it goes through
//! [`ObjectStore`], so any backend with per-object metadata can stand in.

pub mod azure;
pub mod memory;

use blobmirror_core::Fingerprint;

use crate::error::StoreError;

pub use azure::AzureBlobStore;
pub use memory::{MemoryStore, StoredObject};

/// Metadata of an existing remote object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Stored content fingerprint, when the store recorded one.
    pub fingerprint: Option<Fingerprint>,
    pub content_type: Option<String>,
}

/// Remote blob store keyed by destination key.
pub trait ObjectStore {
    /// Look up an object's metadata. `Ok(None)` means the object does not exist.
    fn metadata(&self, key: &str) -> Result<Option<RemoteObject>, StoreError>;

    /// Create or overwrite `key` with `data`.
    fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        fingerprint: Fingerprint,
    ) -> Result<(), StoreError>;

    /// Keys of every object whose key starts with `prefix`, compared as a
    /// plain string. Backends may return extra keys; callers filter again.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
