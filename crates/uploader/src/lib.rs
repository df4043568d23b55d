//! Upload orchestration for the screenshot pipeline.
//!
//! Takes an ordered asset listing, partitions it into transfer units,
//! drives each unit through an abstract background-transfer backend, and
//! aggregates the resulting event streams into one [`UploadState`] snapshot
//! published through [`state::UploadStore`].
//!
//! The backend and the per-asset preparer are trait-shaped collaborators;
//! this crate owns only the sequencing and bookkeeping between them.
//!
//! [`UploadState`]: shotput_protocol::types::UploadState

pub mod backend;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod partition;
pub mod preparer;
pub mod state;

pub use backend::{
    NotificationOptions, TransferBackend, TransferBody, TransferEvent, TransferHandle,
    TransferId, TransferOptions,
};
pub use config::{ConcurrencyPolicy, PartitionPolicy, UploadTarget, UploaderConfig};
pub use error::UploadError;
pub use orchestrator::UploadOrchestrator;
pub use partition::{TransferUnit, partition};
pub use preparer::{LocalFilePreparer, PreparedFile, UnitPreparer};
pub use state::{Subscription, UploadStore};
