//! Storage error taxonomy
//!
//! Three outcomes cover the whole store contract: a tenant-scoped lookup
//! missed, a write lost to uniqueness or a stale version, or the backend
//! itself failed. Validation of domain rules happens above this layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by the convoy store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Record absent, or present under a different tenant.
    #[error("no such record: {0}")]
    NotFound(String),

    /// Uniqueness or compare-on-version violation.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// Backend unavailability, e.g. a poisoned lock in the in-memory
    /// adapter.
    #[error("storage backend: {0}")]
    Backend(String),
}
