//! Audit entries
//!
//! Immutable, append-only record of every mutation: tenant, entity, action
//! tag, before/after snapshots, acting user, timestamp. Producers hand the
//! fully-typed entity over and serialization happens here, so snapshots
//! cannot drift from the entities they describe. Entries are written in the
//! same storage commit as the mutation they record.

use crate::{ActorId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of entity an audit entry describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Tenant,
    Truck,
    Mission,
    MissionDriverAssignment,
    WorkflowConfig,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Tenant => "tenant",
            Self::Truck => "truck",
            Self::Mission => "mission",
            Self::MissionDriverAssignment => "mission_driver_assignment",
            Self::WorkflowConfig => "workflow_config",
        };
        write!(f, "{label}")
    }
}

/// Action tag on an audit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    StatusChanged,
    ConfigUpdated,
    TruckAssigned,
    DriverAssigned,
    AssignmentStatusChanged,
    AssignmentRemoved,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::ConfigUpdated => "config_updated",
            Self::TruckAssigned => "truck_assigned",
            Self::DriverAssigned => "driver_assigned",
            Self::AssignmentStatusChanged => "assignment_status_changed",
            Self::AssignmentRemoved => "assignment_removed",
        };
        write!(f, "{label}")
    }
}

/// One immutable audit record. Never updated or deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub tenant_id: TenantId,
    pub entity_kind: EntityKind,
    pub entity_id: String,
    pub action: AuditAction,
    /// Snapshot of the entity before the mutation; absent on creation.
    pub before: Option<serde_json::Value>,
    /// Snapshot of the entity after the mutation; absent on deletion.
    pub after: Option<serde_json::Value>,
    pub actor_id: ActorId,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Build an entry from typed before/after entities. Serialization is
    /// done here so producers never hand over pre-built blobs.
    pub fn record<B: Serialize, A: Serialize>(
        tenant_id: TenantId,
        entity_kind: EntityKind,
        entity_id: impl Into<String>,
        action: AuditAction,
        before: Option<&B>,
        after: Option<&A>,
        actor_id: ActorId,
        notes: Option<String>,
    ) -> Result<Self, serde_json::Error> {
        let before = before.map(serde_json::to_value).transpose()?;
        let after = after.map(serde_json::to_value).transpose()?;
        Ok(Self {
            id: format!("audit-{}", uuid::Uuid::new_v4()),
            tenant_id,
            entity_kind,
            entity_id: entity_id.into(),
            action,
            before,
            after,
            actor_id,
            notes,
            recorded_at: Utc::now(),
        })
    }
}
