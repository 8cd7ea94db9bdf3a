//! Mission-driver approval sub-workflow
//!
//! An independent small state machine (PENDING → APPROVED | DENIED) gating
//! whether a driver may act on a truck assigned to a mission. Assignments
//! are unique per (mission, driver) pair; assigning an already-assigned
//! driver is a reported no-op, not an error. Removal is refused once any
//! linked truck has progressed beyond the pre-dispatch states.

use crate::{gate, EngineError, EngineResult};
use chrono::Utc;
use convoy_storage::ConvoyStorage;
use convoy_types::{
    Actor, AssignmentStatus, AuditAction, AuditEntry, DriverId, EntityKind,
    MissionDriverAssignment, MissionId, TenantId,
};
use std::sync::Arc;

/// Outcome of assigning one driver to a mission.
#[derive(Clone, Debug)]
pub struct AssignmentOutcome {
    pub driver_id: DriverId,
    pub assignment: MissionDriverAssignment,
    /// False when the driver was already assigned and the existing record
    /// is being reported back.
    pub newly_created: bool,
}

/// Per-driver outcome of a bulk status update. One failed item never rolls
/// back the others.
#[derive(Debug)]
pub struct BatchOutcome {
    pub driver_id: DriverId,
    pub result: EngineResult<MissionDriverAssignment>,
}

/// Runs the mission-driver approval workflow against the store.
pub struct MissionApprovalService {
    storage: Arc<dyn ConvoyStorage>,
}

impl MissionApprovalService {
    pub fn new(storage: Arc<dyn ConvoyStorage>) -> Self {
        Self { storage }
    }

    fn assignment_entity_id(mission_id: &MissionId, driver_id: &DriverId) -> String {
        format!("{mission_id}/{driver_id}")
    }

    /// Create one PENDING assignment per driver not already assigned.
    /// Idempotent per driver; `Validation` on an empty driver list,
    /// `Conflict` on a cancelled or reconciled mission.
    pub async fn assign_drivers(
        &self,
        mission_id: &MissionId,
        driver_ids: &[DriverId],
        tenant_id: &TenantId,
        actor: &Actor,
    ) -> EngineResult<Vec<AssignmentOutcome>> {
        if driver_ids.is_empty() {
            return Err(EngineError::Validation(
                "driver id list must not be empty".to_string(),
            ));
        }

        let mission = self
            .storage
            .get_mission(mission_id, tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("mission not found".to_string()))?;
        if mission.status.is_terminal() {
            return Err(EngineError::Conflict(format!(
                "mission {} is {}; drivers cannot be assigned to it",
                mission.id, mission.status
            )));
        }

        let mut outcomes = Vec::with_capacity(driver_ids.len());
        for driver_id in driver_ids {
            if let Some(existing) = self
                .storage
                .get_assignment(mission_id, driver_id, tenant_id)
                .await?
            {
                outcomes.push(AssignmentOutcome {
                    driver_id: driver_id.clone(),
                    assignment: existing,
                    newly_created: false,
                });
                continue;
            }

            let assignment = MissionDriverAssignment::new(
                mission_id.clone(),
                driver_id.clone(),
                tenant_id.clone(),
                actor.id.clone(),
            );
            let audit = AuditEntry::record(
                tenant_id.clone(),
                EntityKind::MissionDriverAssignment,
                Self::assignment_entity_id(mission_id, driver_id),
                AuditAction::DriverAssigned,
                None::<&MissionDriverAssignment>,
                Some(&assignment),
                actor.id.clone(),
                None,
            )?;
            self.storage
                .insert_assignment(assignment.clone(), audit)
                .await?;

            tracing::info!(
                mission = %mission_id,
                driver = %driver_id,
                tenant = %tenant_id,
                "Driver assigned to mission"
            );

            outcomes.push(AssignmentOutcome {
                driver_id: driver_id.clone(),
                assignment,
                newly_created: true,
            });
        }

        Ok(outcomes)
    }

    /// Move an assignment to a new approval status, stamping the approver
    /// when the assignment leaves PENDING.
    pub async fn update_status(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
        new_status: AssignmentStatus,
        actor: &Actor,
    ) -> EngineResult<MissionDriverAssignment> {
        gate::authorize_assignment_decision(actor.role)?;

        let current = self
            .storage
            .get_assignment(mission_id, driver_id, tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("assignment not found".to_string()))?;

        if !current.status.can_transition_to(new_status) {
            return Err(EngineError::InvalidTransition(format!(
                "Invalid transition from {} to {}",
                current.status, new_status
            )));
        }

        let mut updated = current.clone();
        updated.status = new_status;
        if current.status == AssignmentStatus::Pending {
            updated.approved_by = Some(actor.id.clone());
            updated.approved_at = Some(Utc::now());
        }

        let audit = AuditEntry::record(
            tenant_id.clone(),
            EntityKind::MissionDriverAssignment,
            Self::assignment_entity_id(mission_id, driver_id),
            AuditAction::AssignmentStatusChanged,
            Some(&current),
            Some(&updated),
            actor.id.clone(),
            None,
        )?;

        let stored = self
            .storage
            .update_assignment(current.status, updated, audit)
            .await?;

        tracing::info!(
            mission = %mission_id,
            driver = %driver_id,
            status = %stored.status,
            actor = %actor.id,
            "Assignment status changed"
        );

        Ok(stored)
    }

    /// Apply `update_status` per driver, collecting per-item outcomes.
    pub async fn bulk_update_status(
        &self,
        mission_id: &MissionId,
        driver_ids: &[DriverId],
        tenant_id: &TenantId,
        new_status: AssignmentStatus,
        actor: &Actor,
    ) -> EngineResult<Vec<BatchOutcome>> {
        if driver_ids.is_empty() {
            return Err(EngineError::Validation(
                "driver id list must not be empty".to_string(),
            ));
        }

        let mut outcomes = Vec::with_capacity(driver_ids.len());
        for driver_id in driver_ids {
            let result = self
                .update_status(mission_id, driver_id, tenant_id, new_status, actor)
                .await;
            outcomes.push(BatchOutcome {
                driver_id: driver_id.clone(),
                result,
            });
        }
        Ok(outcomes)
    }

    /// Remove an assignment. Refused with `Conflict` once any truck linked
    /// to the (mission, driver) pair has progressed beyond the tenant's
    /// pre-dispatch states.
    pub async fn remove(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
        actor: &Actor,
    ) -> EngineResult<()> {
        gate::authorize_assignment_decision(actor.role)?;

        let assignment = self
            .storage
            .get_assignment(mission_id, driver_id, tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("assignment not found".to_string()))?;

        let config = self
            .storage
            .workflow_config(tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("tenant not found".to_string()))?;
        let pre_dispatch = config.pre_dispatch_states();

        let trucks = self
            .storage
            .trucks_for_assignment(mission_id, driver_id, tenant_id)
            .await?;
        if let Some(truck) = trucks
            .iter()
            .find(|truck| !pre_dispatch.contains(&truck.status))
        {
            return Err(EngineError::Conflict(format!(
                "truck {} already progressed to {}; assignment cannot be removed",
                truck.id, truck.status
            )));
        }

        let audit = AuditEntry::record(
            tenant_id.clone(),
            EntityKind::MissionDriverAssignment,
            Self::assignment_entity_id(mission_id, driver_id),
            AuditAction::AssignmentRemoved,
            Some(&assignment),
            None::<&MissionDriverAssignment>,
            actor.id.clone(),
            None,
        )?;
        self.storage
            .delete_assignment(mission_id, driver_id, tenant_id, audit)
            .await?;

        tracing::info!(
            mission = %mission_id,
            driver = %driver_id,
            actor = %actor.id,
            "Assignment removed"
        );

        Ok(())
    }
}
