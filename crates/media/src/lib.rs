//! Screenshot asset source.
//!
//! Enumerates candidate screenshots for upload. The uploader consumes this
//! through the [`AssetSource`] trait so tests and alternative libraries can
//! substitute their own enumeration.

mod scanner;

use std::future::Future;
use std::pin::Pin;

use shotput_protocol::types::AssetDescriptor;

pub use scanner::{ScreenshotLibrary, scan_screenshot_dir};

/// Errors produced by the media crate.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of upload candidates.
///
/// Contract: an unreadable or missing library is reported as an empty
/// listing, not an error, so callers never have to special-case access
/// problems before starting a run.
pub trait AssetSource: Send + Sync {
    /// Lists all assets in enumeration order. May be empty.
    fn list_assets(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AssetDescriptor>, MediaError>> + Send + '_>>;
}
