//! Protocol-level constants shared by the upload pipeline.

/// Multipart form field name the ingest endpoint expects.
///
/// Fixed server-side; changing it breaks uploads.
pub const MULTIPART_FIELD: &str = "screenshots";

/// Default number of assets grouped into one batch transfer unit.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Header carrying the anonymous guest identity.
pub const GUEST_ID_HEADER: &str = "X-Guest-Id";

/// Default HTTP method for upload transfers.
pub const DEFAULT_METHOD: &str = "POST";
