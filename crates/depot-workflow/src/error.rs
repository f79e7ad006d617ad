//! Workflow error types.

use thiserror::Error;

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors that can occur while reading a workflow definition.
///
/// Only the JSON boundary is fallible; a syntactically valid payload that is
/// not workflow-shaped parses as the empty workflow instead of erroring.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Payload is not valid JSON.
    #[error("malformed workflow payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
