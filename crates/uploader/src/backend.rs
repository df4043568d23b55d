//! Transfer backend capability.
//!
//! `TransferBackend` is implemented by whatever owns the actual transfer
//! mechanism (an OS background-upload service, an HTTP client, a test mock).
//! Using a trait keeps orchestration decoupled from transport and testable
//! with scripted backends.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::error::UploadError;

/// Backend-assigned transfer identifier.
///
/// Distinct from the local placeholder id a record carries before the
/// backend acknowledges the transfer.
pub type TransferId = String;

/// Event emitted by the backend for one transfer.
///
/// `Completed`, `Error` and `Cancelled` are terminal; the first one observed
/// ends the unit's lifecycle and anything after it is discarded.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// Progress update. `progress` is a percentage and may be fractional.
    Progress { id: TransferId, progress: f64 },
    /// Transfer finished successfully.
    Completed { id: TransferId },
    /// Transfer failed.
    Error { id: TransferId, error: String },
    /// Transfer was cancelled.
    Cancelled { id: TransferId },
}

/// Request body shape for one transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferBody {
    /// Single local file, multipart-encoded under `field`.
    File { path: String, field: String },
    /// JSON manifest listing the locators of a batch unit.
    Manifest(serde_json::Value),
}

/// OS notification shown while a transfer runs in the background.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationOptions {
    pub enabled: bool,
    pub auto_clear: bool,
    pub title: String,
    pub description: String,
}

/// Options for starting one transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOptions {
    pub url: String,
    pub method: String,
    pub body: TransferBody,
    pub headers: HashMap<String, String>,
    pub notification: Option<NotificationOptions>,
}

/// A started transfer: its backend-assigned id plus its event stream.
///
/// The backend keeps the sending side; dropping the receiver is how the
/// orchestrator stops listening after the first terminal event.
pub struct TransferHandle {
    pub id: TransferId,
    pub events: mpsc::Receiver<TransferEvent>,
}

/// Abstract background-transfer capability.
pub trait TransferBackend: Send + Sync {
    /// Begins a transfer and returns its id and event stream.
    ///
    /// Returning is only an acknowledgement that the transfer was accepted;
    /// completion arrives later on the event stream.
    fn start_transfer(
        &self,
        options: TransferOptions,
    ) -> Pin<Box<dyn Future<Output = Result<TransferHandle, UploadError>> + Send + '_>>;

    /// Requests cancellation of a transfer by id.
    ///
    /// The effect, if any, arrives as a `Cancelled` event on that transfer's
    /// stream. Unknown ids may be rejected.
    fn cancel_transfer(
        &self,
        transfer_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + '_>>;
}
