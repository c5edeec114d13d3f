//! Azure Blob Storage backend.
//!
//! Built on `opendal`'s `azblob` service. The operator is async, so the store
//! owns a current-thread runtime and blocks on each call; the engine stays
//! sequential.
//!
//! Azure computes and stores `Content-MD5` for single-shot uploads, so the
//! fingerprint passed to [`put`](ObjectStore::put) is only logged here; later
//! runs read the service-computed value back through [`metadata`].
//!
//! [`metadata`]: ObjectStore::metadata

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use opendal::{services::Azblob, ErrorKind, Operator};
use tokio::runtime::Runtime;

use blobmirror_core::Fingerprint;

use super::{ObjectStore, RemoteObject};
use crate::error::StoreError;

pub struct AzureBlobStore {
    operator: Operator,
    runtime: Runtime,
}

impl AzureBlobStore {
    /// Create a client for `container` from an Azure storage connection
    /// string. No request is sent until the first operation.
    pub fn connect(connection_string: &str, container: &str) -> Result<Self, StoreError> {
        let builder = Azblob::from_connection_string(connection_string)
            .map_err(|e| StoreError::Client(e.to_string()))?
            .container(container);

        let operator = Operator::new(builder)
            .map_err(|e| StoreError::Client(e.to_string()))?
            .finish();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Client(format!("cannot start I/O runtime: {e}")))?;

        tracing::debug!("azure blob client ready for container '{container}'");
        Ok(Self { operator, runtime })
    }
}

fn backend_err(op: &'static str, key: &str, err: opendal::Error) -> StoreError {
    StoreError::Backend {
        op,
        key: key.to_owned(),
        message: err.to_string(),
    }
}

/// The directory to list so that every key starting with `prefix` is
/// covered: everything up to and including the last `/`, or the root.
fn list_root(prefix: &str) -> &str {
    match prefix.rfind('/') {
        Some(idx) => &prefix[..=idx],
        None => "/",
    }
}

/// Decode a base64 `Content-MD5` header into a fingerprint.
fn decode_content_md5(value: &str) -> Option<Fingerprint> {
    let raw = BASE64.decode(value.trim()).ok()?;
    Fingerprint::from_slice(&raw)
}

impl ObjectStore for AzureBlobStore {
    fn metadata(&self, key: &str) -> Result<Option<RemoteObject>, StoreError> {
        let stat = self
            .runtime
            .block_on(async { self.operator.stat(key).await });
        match stat {
            Ok(meta) => Ok(Some(RemoteObject {
                fingerprint: meta.content_md5().and_then(decode_content_md5),
                content_type: meta.content_type().map(str::to_owned),
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(backend_err("stat", key, e)),
        }
    }

    fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        fingerprint: Fingerprint,
    ) -> Result<(), StoreError> {
        tracing::debug!("put {key} ({content_type}, md5 {fingerprint})");
        self.runtime
            .block_on(async {
                self.operator
                    .write_with(key, data)
                    .content_type(content_type)
                    .await
            })
            .map(|_| ())
            .map_err(|e| backend_err("upload", key, e))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        // opendal lists by directory; `site` must also match `sitemap.xml`.
        let dir = list_root(prefix);
        let entries = self
            .runtime
            .block_on(async { self.operator.list_with(dir).recursive(true).await })
            .map_err(|e| backend_err("list", prefix, e))?;

        Ok(entries
            .into_iter()
            .map(|entry| entry.path().trim_start_matches('/').to_owned())
            .filter(|path| {
                !path.is_empty() && !path.ends_with('/') && path.starts_with(prefix)
            })
            .collect())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.runtime
            .block_on(async { self.operator.delete(key).await })
            .map_err(|e| backend_err("delete", key, e))
    }
}
