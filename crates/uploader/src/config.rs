//! Uploader configuration.
//!
//! Serde-friendly so the host application can persist it alongside its
//! other settings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shotput_protocol::constants::DEFAULT_BATCH_SIZE;

/// How assets are grouped into transfer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartitionPolicy {
    /// One unit per asset, multipart-encoded.
    PerFile,
    /// Fixed-size groups submitted as a JSON manifest; the last group may
    /// be short. A size of 0 is treated as 1.
    Batch(usize),
}

impl Default for PartitionPolicy {
    fn default() -> Self {
        Self::PerFile
    }
}

impl PartitionPolicy {
    /// The conventional batch policy using [`DEFAULT_BATCH_SIZE`].
    pub fn default_batch() -> Self {
        Self::Batch(DEFAULT_BATCH_SIZE)
    }
}

/// How many units may be in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConcurrencyPolicy {
    /// Unit k+1 is not submitted until unit k reaches a terminal state.
    Sequential,
    /// Up to n units in flight; a limit of 0 is treated as 1.
    Concurrent(usize),
}

impl Default for ConcurrencyPolicy {
    fn default() -> Self {
        Self::Sequential
    }
}

/// Destination for upload transfers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    /// Full ingest endpoint URL.
    pub url: String,
    /// Extra headers sent with every transfer (guest identity etc).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// Full orchestrator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploaderConfig {
    pub target: UploadTarget,
    #[serde(default)]
    pub partition: PartitionPolicy,
    #[serde(default)]
    pub concurrency: ConcurrencyPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_per_file_sequential() {
        let config = UploaderConfig::default();
        assert_eq!(config.partition, PartitionPolicy::PerFile);
        assert_eq!(config.concurrency, ConcurrencyPolicy::Sequential);
    }

    #[test]
    fn config_json_roundtrip() {
        let mut headers = HashMap::new();
        headers.insert("X-Guest-Id".to_string(), "guest-1".to_string());

        let config = UploaderConfig {
            target: UploadTarget {
                url: "https://api.example.com/v1/screenshots".into(),
                headers,
            },
            partition: PartitionPolicy::Batch(20),
            concurrency: ConcurrencyPolicy::Concurrent(3),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: UploaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn missing_policies_fall_back_to_defaults() {
        let json = r#"{"target":{"url":"https://api.example.com/up"}}"#;
        let parsed: UploaderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.partition, PartitionPolicy::PerFile);
        assert_eq!(parsed.concurrency, ConcurrencyPolicy::Sequential);
        assert!(parsed.target.headers.is_empty());
    }
}
