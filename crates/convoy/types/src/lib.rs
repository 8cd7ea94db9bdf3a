//! Convoy Domain Types
//!
//! Domain model for the convoy logistics workflow engine. Every entity is
//! scoped to exactly one tenant (an isolated humanitarian organization):
//!
//! - **TenantWorkflowConfig**: per-tenant description of the legal truck
//!   states, the transition graph between them, which states require a
//!   Green Light approval to enter, and which states emit checkpoint or
//!   fuel events.
//! - **Truck**: the tracked vehicle. Its status is always a member of the
//!   tenant's configured state set and changes only through the engine.
//! - **Mission**: a planned delivery operation with its own small planning
//!   lifecycle, to which trucks and approved drivers are assigned.
//! - **MissionDriverAssignment**: the PENDING/APPROVED/DENIED gate that
//!   decides whether a driver may act on a truck within a mission.
//! - **AuditEntry**: immutable, append-only record of every mutation,
//!   carrying before/after snapshots serialized from the typed entities.
//! - **CheckpointEvent / FuelEvent**: append-only records of physical
//!   occurrences correlated with state transitions.
//!
//! State names are canonicalized to uppercase at construction, so
//! comparisons throughout the engine are case-insensitive.

#![deny(unsafe_code)]

mod actor;
mod assignment;
mod audit;
mod config;
mod events;
mod ids;
mod mission;
mod state;
mod tenant;
mod truck;

pub use actor::*;
pub use assignment::*;
pub use audit::*;
pub use config::*;
pub use events::*;
pub use ids::*;
pub use mission::*;
pub use state::*;
pub use tenant::*;
pub use truck::*;
