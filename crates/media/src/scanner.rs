//! Directory scanning for screenshot enumeration.
//!
//! Scans a flat screenshots folder and produces asset descriptors in a
//! deterministic order (modification time, then filename).

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use shotput_protocol::types::AssetDescriptor;

use crate::{AssetSource, MediaError};

/// File extensions treated as screenshots.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "heic"];

/// Scans a directory (non-recursively) for image files.
///
/// Results are ordered by modification time, then filename, so repeated
/// scans of an unchanged directory enumerate identically. Subdirectories
/// and non-image files are skipped.
pub fn scan_screenshot_dir(root: &Path) -> Result<Vec<AssetDescriptor>, MediaError> {
    let mut assets = Vec::new();

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        let modified_at: DateTime<Utc> = metadata.modified()?.into();
        let created_at: DateTime<Utc> = metadata.created().map(Into::into).unwrap_or(modified_at);

        assets.push(AssetDescriptor {
            id: filename.clone(),
            filename,
            locator: format!("file://{}", path.to_string_lossy().replace('\\', "/")),
            width: 0,
            height: 0,
            byte_size: metadata.len() as i64,
            created_at,
            modified_at,
        });
    }

    assets.sort_by(|a, b| {
        a.modified_at
            .cmp(&b.modified_at)
            .then_with(|| a.filename.cmp(&b.filename))
    });

    Ok(assets)
}

/// Directory-backed screenshot library.
#[derive(Debug, Clone)]
pub struct ScreenshotLibrary {
    root: PathBuf,
}

impl ScreenshotLibrary {
    /// Creates a library rooted at `root`. The directory may not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the library root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for ScreenshotLibrary {
    fn list_assets(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AssetDescriptor>, MediaError>> + Send + '_>> {
        Box::pin(async move {
            if !self.root.is_dir() {
                // Missing library behaves like a denied permission: empty,
                // not an error.
                warn!(root = %self.root.display(), "screenshot directory not accessible");
                return Ok(Vec::new());
            }

            let assets = scan_screenshot_dir(&self.root)?;
            debug!(root = %self.root.display(), count = assets.len(), "screenshots enumerated");
            Ok(assets)
        })
    }
}
