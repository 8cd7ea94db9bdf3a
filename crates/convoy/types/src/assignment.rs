//! Mission-driver assignments
//!
//! The approval gate between a driver and a mission. A driver may act on a
//! truck within a mission only while their assignment is APPROVED. The
//! record is unique per (mission, driver) pair; re-assignment after a
//! denial is delete-and-recreate, never a move back to PENDING.

use crate::{ActorId, DriverId, MissionId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval status of a mission-driver assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Pending,
    Approved,
    Denied,
}

impl AssignmentStatus {
    /// Legal approval moves: PENDING resolves to APPROVED or DENIED, and a
    /// resolved assignment may be flipped between the two. Nothing returns
    /// to PENDING.
    pub fn can_transition_to(self, next: AssignmentStatus) -> bool {
        use AssignmentStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Denied) | (Approved, Denied) | (Denied, Approved)
        )
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
        };
        write!(f, "{label}")
    }
}

/// Ternary relation between a mission, a driver, and their tenant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissionDriverAssignment {
    pub mission_id: MissionId,
    pub driver_id: DriverId,
    pub tenant_id: TenantId,
    pub status: AssignmentStatus,
    pub assigned_by: ActorId,
    pub assigned_at: DateTime<Utc>,
    /// Stamped when the assignment first leaves PENDING.
    pub approved_by: Option<ActorId>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl MissionDriverAssignment {
    pub fn new(
        mission_id: MissionId,
        driver_id: DriverId,
        tenant_id: TenantId,
        assigned_by: ActorId,
    ) -> Self {
        Self {
            mission_id,
            driver_id,
            tenant_id,
            status: AssignmentStatus::Pending,
            assigned_by,
            assigned_at: Utc::now(),
            approved_by: None,
            approved_at: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == AssignmentStatus::Approved
    }
}
