//! Error taxonomy for engine operations
//!
//! The first five variants are expected, recoverable-by-the-caller
//! outcomes and are preserved end-to-end so callers can render
//! "not allowed", "not possible", and "conflicts with existing progress"
//! differently. Only `Storage` is unexpected.

use convoy_storage::StorageError;
use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Entity absent or tenant mismatch. The two are deliberately
    /// indistinguishable so cross-tenant existence never leaks.
    #[error("not found: {0}")]
    NotFound(String),

    /// Role gate or mission-approval gate failed.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// State-graph violation. The message already reads
    /// "Invalid transition from X to Y".
    #[error("{0}")]
    InvalidTransition(String),

    /// Concurrent-write version mismatch, duplicate record, or removal of
    /// an assignment whose truck already progressed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Malformed input, e.g. an empty driver list or an invalid workflow
    /// configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage-layer unavailability; fatal from the engine's perspective.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<StorageError> for EngineError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(msg) => Self::NotFound(msg),
            StorageError::Conflict(msg) => Self::Conflict(msg),
            StorageError::Backend(msg) => Self::Storage(msg),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage(value.to_string())
    }
}
