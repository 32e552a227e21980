use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds surfaced by a load run.
///
/// Every kind is fatal: the run aborts at the step where it occurred and
/// previously committed steps stay applied. Incompatible existing tables
/// are not detected up front; they fail at the warehouse during the load
/// and surface as [`LoadError::WarehouseUnavailable`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read, or it has no header row when one
    /// is required.
    #[error("invalid input {}: {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },
    /// Connection or query failure against the warehouse.
    #[error("warehouse unavailable: {0}")]
    WarehouseUnavailable(#[from] postgres::Error),
    /// The object-storage write did not complete.
    #[error("storage upload failed for '{key}': {source}")]
    StorageUploadFailed {
        key: String,
        #[source]
        source: s3::error::S3Error,
    },
}
