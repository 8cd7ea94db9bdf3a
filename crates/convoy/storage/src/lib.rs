//! Convoy storage abstractions.
//!
//! This crate defines the storage contract the workflow engine runs
//! against:
//! - tenants and their workflow configuration
//! - trucks, missions, and mission-driver assignments (system of record)
//! - append-only audit entries and checkpoint/fuel events
//!
//! Design stance:
//! - Every mutating operation carries the audit entry describing it and is
//!   applied as one atomic unit: no committed change without its entry, no
//!   entry without its change.
//! - Versioned entities are written compare-on-version; a stale write fails
//!   with a conflict instead of overwriting.
//! - The in-memory adapter is deterministic and test-friendly. Production
//!   deployments should use a transactional backend for source-of-truth
//!   data.

#![deny(unsafe_code)]

mod error;
pub mod memory;
mod model;
mod traits;

pub use error::{StorageError, StorageResult};
pub use model::{AuditFilter, EventFilter, TransitionCommit};
pub use traits::{
    AssignmentStore, AuditStore, ConvoyStorage, EventStore, MissionStore, QueryWindow, TenantStore,
    TruckStore,
};
