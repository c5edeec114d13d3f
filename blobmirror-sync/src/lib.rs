//! # blobmirror-sync
//!
//! Mirror a local directory into an object-storage container.
//!
//! Call [`run`] for a full pass, or [`upload_phase`] and [`reconcile_phase`]
//! separately. The remote side is any [`ObjectStore`]; [`MemoryStore`] backs
//! tests and [`AzureBlobStore`] talks to Azure Blob Storage.

pub mod engine;
pub mod error;
pub mod plan;
pub mod report;
pub mod store;

pub use engine::{reconcile_phase, run, upload_phase};
pub use error::{StoreError, SyncError};
pub use report::{
    DeleteOutcome, DeleteResult, NoopReporter, Reporter, SyncReport, UploadOutcome, UploadResult,
};
pub use store::{AzureBlobStore, MemoryStore, ObjectStore, RemoteObject, StoredObject};
