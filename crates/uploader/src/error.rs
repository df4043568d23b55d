//! Upload error types.

/// Errors produced while driving a transfer unit.
///
/// None of these escape a run: the orchestrator absorbs every unit-level
/// failure into that unit's [`UploadRecord`].
///
/// [`UploadRecord`]: shotput_protocol::types::UploadRecord
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preparation failed: {0}")]
    Prepare(String),

    #[error("transfer start failed: {0}")]
    Start(String),

    #[error("backend error: {0}")]
    Backend(String),
}
