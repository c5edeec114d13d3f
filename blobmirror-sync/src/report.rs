//! Per-item outcomes, run summary, and progress callbacks.

use std::fmt;
use std::path::{Path, PathBuf};

use blobmirror_core::{DestinationKey, KeepSet};

// ---------------------------------------------------------------------------
// Upload outcomes
// ---------------------------------------------------------------------------

/// What happened to a single local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Content differed from (or was missing in) the store and was uploaded.
    Uploaded,
    /// Dry run: the file *would* have been uploaded.
    WouldUpload,
    /// Remote fingerprint matches the local content.
    Skipped,
    /// Reading, looking up, or uploading the file failed.
    Failed { error: String },
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Uploaded => write!(f, "done"),
            UploadOutcome::WouldUpload => write!(f, "would upload"),
            UploadOutcome::Skipped => write!(f, "skipped"),
            UploadOutcome::Failed { error } => write!(f, "failed, error: {error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub path: PathBuf,
    pub key: DestinationKey,
    pub content_type: &'static str,
    pub outcome: UploadOutcome,
}

// ---------------------------------------------------------------------------
// Delete outcomes
// ---------------------------------------------------------------------------

/// What happened to a single stale remote object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    WouldDelete,
    Failed { error: String },
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Deleted => write!(f, "done"),
            DeleteOutcome::WouldDelete => write!(f, "would delete"),
            DeleteOutcome::Failed { error } => write!(f, "failed, error: {error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    pub key: String,
    pub outcome: DeleteOutcome,
}

// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

/// Everything a run did, in processing order.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub keep: KeepSet,
    pub uploads: Vec<UploadResult>,
    /// Empty unless reconciliation ran.
    pub deletes: Vec<DeleteResult>,
}

impl SyncReport {
    /// Uploaded files, or files that would be uploaded in a dry run.
    pub fn uploaded(&self) -> usize {
        self.uploads
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    UploadOutcome::Uploaded | UploadOutcome::WouldUpload
                )
            })
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.uploads
            .iter()
            .filter(|r| r.outcome == UploadOutcome::Skipped)
            .count()
    }

    /// Deleted objects, or objects that would be deleted in a dry run.
    pub fn deleted(&self) -> usize {
        self.deletes
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    DeleteOutcome::Deleted | DeleteOutcome::WouldDelete
                )
            })
            .count()
    }

    /// Failed uploads plus failed deletes.
    pub fn failed(&self) -> usize {
        let uploads = self
            .uploads
            .iter()
            .filter(|r| matches!(r.outcome, UploadOutcome::Failed { .. }))
            .count();
        let deletes = self
            .deletes
            .iter()
            .filter(|r| matches!(r.outcome, DeleteOutcome::Failed { .. }))
            .count();
        uploads + deletes
    }
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// Progress callbacks, invoked around every item as it is processed.
pub trait Reporter {
    fn upload_started(&mut self, _path: &Path, _key: &DestinationKey) {}
    fn upload_finished(&mut self, _result: &UploadResult) {}
    fn delete_started(&mut self, _key: &str) {}
    fn delete_finished(&mut self, _result: &DeleteResult) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}
