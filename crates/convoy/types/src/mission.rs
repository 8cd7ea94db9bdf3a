//! Missions and their planning lifecycle

use crate::{MissionId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Planning status of a mission. This is a fixed lifecycle, separate from
/// the tenant-configurable truck state graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Created,
    Active,
    Completed,
    /// Terminal accounting step confirming cargo/fuel/damage figures.
    Reconciled,
    /// Absorbing alternative, reachable before completion.
    Cancelled,
}

impl MissionStatus {
    /// Whether moving to `next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: MissionStatus) -> bool {
        use MissionStatus::*;
        matches!(
            (self, next),
            (Created, Active)
                | (Active, Completed)
                | (Completed, Reconciled)
                | (Created, Cancelled)
                | (Active, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Reconciled | MissionStatus::Cancelled)
    }
}

impl std::fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Created => "CREATED",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Reconciled => "RECONCILED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{label}")
    }
}

/// A planned delivery operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub tenant_id: TenantId,
    pub name: String,
    pub status: MissionStatus,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    pub fn new(tenant_id: TenantId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MissionId::generate(),
            tenant_id,
            name: name.into(),
            status: MissionStatus::Created,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}
