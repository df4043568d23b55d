//! Shared data model for the screenshot upload pipeline.
//!
//! Types here cross crate boundaries: the media crate produces
//! [`types::AssetDescriptor`]s, the uploader crate aggregates them into an
//! [`types::UploadState`] snapshot consumed by whoever renders progress.

pub mod constants;
pub mod types;
