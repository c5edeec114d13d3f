//! In-memory [`ObjectStore`] with call recording and failure injection.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use blobmirror_core::Fingerprint;

use super::{ObjectStore, RemoteObject};
use crate::error::StoreError;

/// An object held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub fingerprint: Option<Fingerprint>,
}

#[derive(Debug, Default)]
struct Inner {
    objects: BTreeMap<String, StoredObject>,
    puts: Vec<String>,
    deletes: Vec<String>,
    failing_puts: BTreeSet<String>,
    failing_deletes: BTreeSet<String>,
    failing_metadata: BTreeSet<String>,
    failing_list: bool,
}

/// Deterministic store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed an object with its fingerprint recorded.
    pub fn insert(&self, key: &str, data: &[u8], content_type: &str) {
        self.insert_object(
            key,
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_owned(),
                fingerprint: Some(Fingerprint::of(data)),
            },
        );
    }

    /// Seed an object exactly as given, without touching the call log.
    pub fn insert_object(&self, key: &str, object: StoredObject) {
        self.lock().objects.insert(key.to_owned(), object);
    }

    /// Make every `put` of `key` fail.
    pub fn fail_put(&self, key: &str) {
        self.lock().failing_puts.insert(key.to_owned());
    }

    /// Make every `delete` of `key` fail.
    pub fn fail_delete(&self, key: &str) {
        self.lock().failing_deletes.insert(key.to_owned());
    }

    /// Make every `metadata` lookup of `key` fail.
    pub fn fail_metadata(&self, key: &str) {
        self.lock().failing_metadata.insert(key.to_owned());
    }

    /// Make every `list` call fail.
    pub fn fail_list(&self) {
        self.lock().failing_list = true;
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().objects.get(key).cloned()
    }

    /// All stored keys in lexical order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    /// Keys passed to `put`, in call order, including failed calls.
    pub fn put_calls(&self) -> Vec<String> {
        self.lock().puts.clone()
    }

    /// Keys passed to `delete`, in call order, including failed calls.
    pub fn delete_calls(&self) -> Vec<String> {
        self.lock().deletes.clone()
    }

    /// Forget recorded calls; objects and injected failures stay.
    pub fn clear_calls(&self) {
        let mut inner = self.lock();
        inner.puts.clear();
        inner.deletes.clear();
    }
}

fn injected(op: &'static str, key: &str) -> StoreError {
    StoreError::Backend {
        op,
        key: key.to_owned(),
        message: "injected failure".to_owned(),
    }
}

impl ObjectStore for MemoryStore {
    fn metadata(&self, key: &str) -> Result<Option<RemoteObject>, StoreError> {
        let inner = self.lock();
        if inner.failing_metadata.contains(key) {
            return Err(injected("stat", key));
        }
        Ok(inner.objects.get(key).map(|obj| RemoteObject {
            fingerprint: obj.fingerprint,
            content_type: Some(obj.content_type.clone()),
        }))
    }

    fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        fingerprint: Fingerprint,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.puts.push(key.to_owned());
        if inner.failing_puts.contains(key) {
            return Err(injected("put", key));
        }
        inner.objects.insert(
            key.to_owned(),
            StoredObject {
                data,
                content_type: content_type.to_owned(),
                fingerprint: Some(fingerprint),
            },
        );
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.lock();
        if inner.failing_list {
            return Err(injected("list", prefix));
        }
        Ok(inner
            .objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.deletes.push(key.to_owned());
        if inner.failing_deletes.contains(key) {
            return Err(injected("delete", key));
        }
        inner.objects.remove(key);
        Ok(())
    }
}
