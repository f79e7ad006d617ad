//! Service error types.

use depot_opendal::StorageError;
use thiserror::Error;
use uuid::Uuid;

/// Result type for depot service operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur in the depot service layer.
#[derive(Debug, Error)]
pub enum Error {
    /// No stored analysis exists for the given id.
    #[error("analysis {0} not found")]
    AnalysisNotFound(Uuid),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
