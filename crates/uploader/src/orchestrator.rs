//! Upload orchestrator.
//!
//! Drives a run: partition assets into units, push each unit through the
//! backend, fold the per-unit event streams into the shared state store.
//! A run is infallible from the caller's perspective; every failure ends up
//! as per-unit state, and the run always terminates with
//! `is_uploading = false` published.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::future::join_all;
use futures_util::stream;
use tracing::{debug, info, warn};

use shotput_protocol::constants::{DEFAULT_METHOD, MULTIPART_FIELD};
use shotput_protocol::types::{AssetDescriptor, UploadRecord, UploadState, UploadStatus};

use crate::backend::{
    NotificationOptions, TransferBackend, TransferBody, TransferEvent, TransferHandle,
    TransferOptions,
};
use crate::config::{ConcurrencyPolicy, PartitionPolicy, UploaderConfig};
use crate::error::UploadError;
use crate::partition::{TransferUnit, partition};
use crate::preparer::UnitPreparer;
use crate::state::{Subscription, UploadStore};

/// Orchestrates screenshot upload runs against a transfer backend.
pub struct UploadOrchestrator {
    config: UploaderConfig,
    backend: Arc<dyn TransferBackend>,
    preparer: Option<Arc<dyn UnitPreparer>>,
    store: UploadStore,
}

impl UploadOrchestrator {
    /// Creates an orchestrator with no preparer (locators are submitted
    /// as-is).
    pub fn new(config: UploaderConfig, backend: Arc<dyn TransferBackend>) -> Self {
        Self {
            config,
            backend,
            preparer: None,
            store: UploadStore::new(),
        }
    }

    /// Attaches a unit preparer run on every asset before submission.
    pub fn with_preparer(mut self, preparer: Arc<dyn UnitPreparer>) -> Self {
        self.preparer = Some(preparer);
        self
    }

    /// Returns a copy of the current upload state.
    pub fn snapshot(&self) -> UploadState {
        self.store.snapshot()
    }

    /// Subscribes to state snapshots; one callback per published update.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&UploadState) + Send + Sync + 'static,
    {
        self.store.subscribe(observer)
    }

    /// Spawns a run without awaiting it. Results are observed through
    /// [`subscribe`](Self::subscribe)/[`snapshot`](Self::snapshot).
    pub fn start_run(self: &Arc<Self>, assets: Vec<AssetDescriptor>) {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            orchestrator.run(assets).await;
        });
    }

    /// Runs one upload pass over `assets`.
    ///
    /// An empty listing is a no-op: no state reset, no notification, so
    /// subscribers never see an empty progress flash.
    pub async fn run(&self, assets: Vec<AssetDescriptor>) {
        if assets.is_empty() {
            debug!("upload run skipped: no assets");
            return;
        }

        let total_files = assets.len();
        let units = partition(&assets, self.config.partition);
        let total_units = units.len();
        info!(files = total_files, units = total_units, "upload run started");

        self.store.update(|state| {
            *state = UploadState {
                is_uploading: true,
                total_files,
                completed_files: 0,
                failed_files: 0,
                uploads: units
                    .iter()
                    .map(|unit| UploadRecord::pending(unit.placeholder_id(), unit.display_name()))
                    .collect(),
            };
        });

        match self.config.concurrency {
            ConcurrencyPolicy::Sequential => {
                for unit in &units {
                    self.process_unit(unit, total_units).await;
                }
            }
            ConcurrencyPolicy::Concurrent(limit) => {
                stream::iter(&units)
                    .for_each_concurrent(limit.max(1), |unit| self.process_unit(unit, total_units))
                    .await;
            }
        }

        self.store.update(|state| state.is_uploading = false);

        let snapshot = self.store.snapshot();
        info!(
            completed = snapshot.completed_files,
            failed = snapshot.failed_files,
            total = snapshot.total_files,
            "upload run finished"
        );
    }

    /// Forwards a cancellation request for one transfer id.
    ///
    /// State is not touched here; if the backend honors the request, a
    /// `Cancelled` event arrives on that unit's stream.
    pub async fn cancel(&self, upload_id: &str) {
        if let Err(e) = self.backend.cancel_transfer(upload_id).await {
            warn!(upload_id, error = %e, "cancel request failed");
        }
    }

    /// Requests cancellation of every unit still pending or uploading.
    ///
    /// Requests go out concurrently; individual failures (including
    /// placeholder ids the backend never saw) are logged and swallowed.
    pub async fn cancel_all(&self) {
        let snapshot = self.store.snapshot();
        let targets: Vec<String> = snapshot
            .uploads
            .iter()
            .filter(|u| matches!(u.status, UploadStatus::Pending | UploadStatus::Uploading))
            .map(|u| u.upload_id.clone())
            .collect();

        info!(count = targets.len(), "cancelling active uploads");
        let results = join_all(targets.iter().map(|id| self.backend.cancel_transfer(id))).await;
        for (id, result) in targets.iter().zip(results) {
            if let Err(e) = result {
                warn!(upload_id = %id, error = %e, "cancel request failed");
            }
        }
    }

    async fn process_unit(&self, unit: &TransferUnit, total_units: usize) {
        let paths = match self.prepare_unit(unit).await {
            Ok(paths) => paths,
            Err(e) => {
                warn!(unit = unit.index, error = %e, "unit preparation failed");
                self.fail_unit(unit.index, unit.assets.len(), e.to_string());
                return;
            }
        };

        let options = self.build_options(unit, paths, total_units);
        let handle = match self.backend.start_transfer(options).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(unit = unit.index, error = %e, "transfer start failed");
                self.fail_unit(unit.index, unit.assets.len(), e.to_string());
                return;
            }
        };

        let transfer_id = handle.id.clone();
        debug!(unit = unit.index, transfer_id = %transfer_id, "transfer started");
        self.store.update(|state| {
            if let Some(record) = state.uploads.get_mut(unit.index) {
                record.upload_id = transfer_id;
            }
        });

        self.drive_events(unit, handle).await;
    }

    /// Resolves every asset of the unit to a submittable path.
    ///
    /// Without a preparer the raw locators go through untouched. The first
    /// preparation failure fails the whole unit before the backend is
    /// contacted.
    async fn prepare_unit(&self, unit: &TransferUnit) -> Result<Vec<String>, UploadError> {
        let Some(preparer) = &self.preparer else {
            return Ok(unit.assets.iter().map(|a| a.locator.clone()).collect());
        };

        let mut paths = Vec::with_capacity(unit.assets.len());
        for asset in &unit.assets {
            let prepared = preparer.prepare(asset).await?;
            paths.push(prepared.path);
        }
        Ok(paths)
    }

    fn build_options(
        &self,
        unit: &TransferUnit,
        mut paths: Vec<String>,
        total_units: usize,
    ) -> TransferOptions {
        let body = match self.config.partition {
            PartitionPolicy::PerFile => TransferBody::File {
                path: paths.pop().unwrap_or_default(),
                field: MULTIPART_FIELD.to_string(),
            },
            PartitionPolicy::Batch(_) => {
                TransferBody::Manifest(serde_json::json!({ MULTIPART_FIELD: paths }))
            }
        };

        TransferOptions {
            url: self.config.target.url.clone(),
            method: DEFAULT_METHOD.to_string(),
            body,
            headers: self.config.target.headers.clone(),
            notification: Some(NotificationOptions {
                enabled: true,
                auto_clear: true,
                title: format!(
                    "Uploading screenshots [{}/{}]",
                    unit.index + 1,
                    total_units
                ),
                description: unit.display_name(),
            }),
        }
    }

    /// Consumes the unit's event stream until the first terminal event.
    ///
    /// Dropping the receiver on return is the teardown: anything the
    /// backend emits after the first terminal event is discarded, so
    /// duplicates can never double-count.
    async fn drive_events(&self, unit: &TransferUnit, mut handle: TransferHandle) {
        let index = unit.index;
        let asset_count = unit.assets.len();

        while let Some(event) = handle.events.recv().await {
            match event {
                TransferEvent::Progress { progress, .. } => {
                    let pct = clamp_progress(progress);
                    self.store.update(|state| {
                        if let Some(record) = state.uploads.get_mut(index) {
                            record.progress = pct;
                            record.status = UploadStatus::Uploading;
                        }
                    });
                }
                TransferEvent::Completed { .. } => {
                    debug!(unit = index, "transfer completed");
                    self.store.update(|state| {
                        if let Some(record) = state.uploads.get_mut(index) {
                            record.progress = 100;
                            record.status = UploadStatus::Completed;
                            record.error = None;
                        }
                        state.completed_files += asset_count;
                    });
                    return;
                }
                TransferEvent::Error { error, .. } => {
                    warn!(unit = index, error = %error, "transfer failed");
                    self.fail_unit(index, asset_count, error);
                    return;
                }
                TransferEvent::Cancelled { .. } => {
                    // Cancelled counts toward neither total; the record
                    // keeps its last observed progress and status.
                    warn!(unit = index, "transfer cancelled");
                    return;
                }
            }
        }

        // Stream closed with no terminal event. Record a failure so the
        // run cannot end with a unit stuck in limbo.
        warn!(unit = index, "event stream closed without terminal event");
        self.fail_unit(index, asset_count, "transfer ended without result".to_string());
    }

    fn fail_unit(&self, index: usize, asset_count: usize, message: String) {
        self.store.update(|state| {
            if let Some(record) = state.uploads.get_mut(index) {
                record.progress = 0;
                record.status = UploadStatus::Error;
                record.error = Some(message);
            }
            state.failed_files += asset_count;
        });
    }
}

/// Rounds a fractional backend percentage to an integer, clamped to 0..=99.
///
/// 100 is reserved for the `Completed` event so `progress == 100` holds
/// exactly for completed records.
fn clamp_progress(progress: f64) -> u8 {
    progress.round().clamp(0.0, 99.0) as u8
}
