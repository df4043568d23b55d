//! Optional per-asset preparation before submission.
//!
//! A preparer converts an asset's locator into a transfer-ready local path,
//! possibly re-encoding along the way. The orchestrator only consumes the
//! success/failure outcome; preparation internals stay behind the trait.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use shotput_protocol::types::AssetDescriptor;

use crate::error::UploadError;

/// A transfer-ready file produced from one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFile {
    pub asset_id: String,
    /// Plain filesystem path the backend can read.
    pub path: String,
}

/// Converts asset locators into transfer-ready local files.
pub trait UnitPreparer: Send + Sync {
    fn prepare(
        &self,
        asset: &AssetDescriptor,
    ) -> Pin<Box<dyn Future<Output = Result<PreparedFile, UploadError>> + Send + '_>>;
}

/// Resolves `file://` locators to plain paths and verifies they exist.
///
/// The minimal preparer: no re-encoding, just locator resolution, so a bad
/// locator fails the unit before the backend is contacted.
#[derive(Debug, Clone, Default)]
pub struct LocalFilePreparer;

impl LocalFilePreparer {
    pub fn new() -> Self {
        Self
    }
}

impl UnitPreparer for LocalFilePreparer {
    fn prepare(
        &self,
        asset: &AssetDescriptor,
    ) -> Pin<Box<dyn Future<Output = Result<PreparedFile, UploadError>> + Send + '_>> {
        let asset_id = asset.id.clone();
        let filename = asset.filename.clone();
        let path = asset
            .locator
            .strip_prefix("file://")
            .unwrap_or(&asset.locator)
            .to_string();

        Box::pin(async move {
            match tokio::fs::metadata(Path::new(&path)).await {
                Ok(meta) if meta.is_file() => Ok(PreparedFile { asset_id, path }),
                Ok(_) => Err(UploadError::Prepare(format!("not a file: {filename}"))),
                Err(e) => Err(UploadError::Prepare(format!("cannot read {filename}: {e}"))),
            }
        })
    }
}
