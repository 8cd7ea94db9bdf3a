//! Storage-facing value types

use chrono::{DateTime, Utc};
use convoy_types::{
    AuditEntry, CheckpointEvent, EntityKind, FuelEvent, MissionId, StateName, TenantId, TruckId,
};

/// One atomic truck transition: the compare-on-version status write plus
/// the audit entry and any physical events it produced. The store applies
/// all of it or none of it.
#[derive(Debug)]
pub struct TransitionCommit {
    pub truck_id: TruckId,
    pub tenant_id: TenantId,
    /// Version the caller read; the write fails with a conflict if the
    /// stored truck has moved on.
    pub expected_version: u64,
    pub new_status: StateName,
    pub updated_at: DateTime<Utc>,
    pub audit: AuditEntry,
    pub checkpoint: Option<CheckpointEvent>,
    pub fuel: Option<FuelEvent>,
}

/// Filters for audit history reads. All fields are conjunctive.
#[derive(Clone, Debug, Default)]
pub struct AuditFilter {
    pub entity_kind: Option<EntityKind>,
    pub entity_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Filters for checkpoint/fuel event reads.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    pub truck_id: Option<TruckId>,
    pub mission_id: Option<MissionId>,
}
