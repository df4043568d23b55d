use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One screenshot asset enumerated from the library.
///
/// Immutable once produced. `locator` is an opaque URI (`file://...` for the
/// directory-backed source); the uploader never interprets it beyond handing
/// it to the preparer/backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    pub id: String,
    pub filename: String,
    pub locator: String,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub width: u32,
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub height: u32,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub byte_size: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

/// Lifecycle state of one transfer unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Error,
}

/// Per-unit progress record, one per transfer unit for the whole run.
///
/// Identified stably by its position in [`UploadState::uploads`];
/// `upload_id` starts as a local placeholder and is rewritten once the
/// backend assigns a real transfer id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub upload_id: String,
    pub display_name: String,
    /// Integer percentage 0-100. Equals 100 exactly when `status` is
    /// `Completed`; in-flight reports are clamped below that.
    pub progress: u8,
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadRecord {
    /// A fresh pending record with a placeholder id.
    pub fn pending(upload_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            upload_id: upload_id.into(),
            display_name: display_name.into(),
            progress: 0,
            status: UploadStatus::Pending,
            error: None,
        }
    }
}

/// Aggregate snapshot of an upload run.
///
/// `total_files` counts underlying assets, not transfer units. Cancelled
/// units count toward neither `completed_files` nor `failed_files`, so
/// `completed_files + failed_files <= total_files` always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    pub is_uploading: bool,
    pub total_files: usize,
    pub completed_files: usize,
    pub failed_files: usize,
    pub uploads: Vec<UploadRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_descriptor_json_roundtrip() {
        let asset = AssetDescriptor {
            id: "IMG_0001.png".into(),
            filename: "IMG_0001.png".into(),
            locator: "file:///screenshots/IMG_0001.png".into(),
            width: 1170,
            height: 2532,
            byte_size: 204800,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        };
        let json = serde_json::to_string(&asset).unwrap();
        assert!(json.contains("\"byteSize\""));
        let parsed: AssetDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, parsed);
    }

    #[test]
    fn asset_descriptor_omits_zero_dimensions() {
        let asset = AssetDescriptor {
            id: "a".into(),
            filename: "a.png".into(),
            locator: "file:///a.png".into(),
            width: 0,
            height: 0,
            byte_size: 0,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        };
        let json = serde_json::to_string(&asset).unwrap();
        assert!(!json.contains("width"));
        assert!(!json.contains("byteSize"));
    }

    #[test]
    fn upload_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UploadStatus::Uploading).unwrap(),
            "\"uploading\""
        );
        assert_eq!(
            serde_json::to_string(&UploadStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn pending_record_defaults() {
        let rec = UploadRecord::pending("unit-0", "IMG_0001.png");
        assert_eq!(rec.progress, 0);
        assert_eq!(rec.status, UploadStatus::Pending);
        assert!(rec.error.is_none());

        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn upload_state_default_is_idle() {
        let state = UploadState::default();
        assert!(!state.is_uploading);
        assert_eq!(state.total_files, 0);
        assert!(state.uploads.is_empty());
    }
}
