//! The two-phase mirror.
//!
//! ## Upload phase, per file
//!
//! 1. Map the path to its destination key.
//! 2. Record the key in the keep-set (even if the upload is skipped or fails).
//! 3. Read the file fully and MD5 it.
//! 4. Look up the remote fingerprint; a missing object has none.
//! 5. Resolve the content type.
//! 6. Upload only when the fingerprints differ.
//!
//! ## Reconcile phase
//!
//! List the objects whose key starts with the prefix and delete every key the
//! upload phase did not record. The prefix is matched as a plain string, so
//! `site` also covers `sitemap.xml` and `site-old/...`.

use blobmirror_core::{content_type, Fingerprint, KeepSet, SyncConfig};

use crate::error::{io_err, SyncError};
use crate::plan::{plan, PlannedFile};
use crate::report::{
    DeleteOutcome, DeleteResult, Reporter, SyncReport, UploadOutcome, UploadResult,
};
use crate::store::ObjectStore;

// ---------------------------------------------------------------------------
// Upload phase
// ---------------------------------------------------------------------------

/// Mirror every file under `config.source` into `store`.
///
/// Returns the keep-set and one result per file. Per-file failures are
/// recorded as [`UploadOutcome::Failed`]; only planning errors abort. With
/// `config.sync` set, an unreadable source entry is a planning error, since
/// its remote copies would otherwise be deleted.
pub fn upload_phase(
    config: &SyncConfig,
    store: &dyn ObjectStore,
    reporter: &mut dyn Reporter,
) -> Result<(KeepSet, Vec<UploadResult>), SyncError> {
    let files = plan(&config.source, &config.dest_prefix, config.sync)?;
    let mut keep = KeepSet::new();
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        reporter.upload_started(&file.path, &file.key);
        keep.insert(file.key.clone());

        let content_type = content_type::resolve(&file.path);
        let outcome = match upload_file(&file, content_type, store, config.dry_run) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("upload of {} failed: {err}", file.path.display());
                UploadOutcome::Failed {
                    error: err.to_string(),
                }
            }
        };

        let result = UploadResult {
            path: file.path,
            key: file.key,
            content_type,
            outcome,
        };
        reporter.upload_finished(&result);
        results.push(result);
    }

    Ok((keep, results))
}

fn upload_file(
    file: &PlannedFile,
    content_type: &'static str,
    store: &dyn ObjectStore,
    dry_run: bool,
) -> Result<UploadOutcome, SyncError> {
    let data = std::fs::read(&file.path).map_err(|e| io_err(&file.path, e))?;
    let local = Fingerprint::of(&data);

    let remote = store
        .metadata(file.key.as_str())?
        .and_then(|object| object.fingerprint);

    if remote == Some(local) {
        tracing::debug!("unchanged: {} (md5 {local})", file.key);
        return Ok(UploadOutcome::Skipped);
    }

    if dry_run {
        tracing::info!("[dry-run] would upload: {}", file.key);
        return Ok(UploadOutcome::WouldUpload);
    }

    store.put(file.key.as_str(), data, content_type, local)?;
    tracing::info!("uploaded: {} ({content_type}, md5 {local})", file.key);
    Ok(UploadOutcome::Uploaded)
}

// ---------------------------------------------------------------------------
// Reconcile phase
// ---------------------------------------------------------------------------

/// Delete every object whose key starts with `config.dest_prefix` and is not
/// in `keep`.
///
/// A failing delete is recorded and the remaining deletions continue; a
/// failing listing aborts the phase.
pub fn reconcile_phase(
    config: &SyncConfig,
    store: &dyn ObjectStore,
    keep: &KeepSet,
    reporter: &mut dyn Reporter,
) -> Result<Vec<DeleteResult>, SyncError> {
    let prefix = config.dest_prefix.as_str();
    let listed = store.list(prefix).map_err(|source| SyncError::List {
        prefix: prefix.to_owned(),
        source,
    })?;

    let mut results = Vec::new();
    for key in listed {
        if !key.starts_with(prefix) || keep.contains(&key) {
            continue;
        }

        reporter.delete_started(&key);
        let outcome = if config.dry_run {
            tracing::info!("[dry-run] would delete: {key}");
            DeleteOutcome::WouldDelete
        } else {
            match store.delete(&key) {
                Ok(()) => {
                    tracing::info!("deleted: {key}");
                    DeleteOutcome::Deleted
                }
                Err(err) => {
                    tracing::warn!("delete of {key} failed: {err}");
                    DeleteOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            }
        };

        let result = DeleteResult { key, outcome };
        reporter.delete_finished(&result);
        results.push(result);
    }

    Ok(results)
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Upload phase, then the reconcile phase when `config.sync` is set.
pub fn run(
    config: &SyncConfig,
    store: &dyn ObjectStore,
    reporter: &mut dyn Reporter,
) -> Result<SyncReport, SyncError> {
    let (keep, uploads) = upload_phase(config, store, reporter)?;
    let deletes = if config.sync {
        reconcile_phase(config, store, &keep, reporter)?
    } else {
        Vec::new()
    };

    Ok(SyncReport {
        keep,
        uploads,
        deletes,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
