//! Truck state controller
//!
//! Orchestrates a single truck transition: tenant-scoped load, mission
//! approval gate, role gate, graph validation, then one atomic storage
//! commit carrying the status write, the audit entry, and any checkpoint
//! or fuel event. Every guard runs before the commit, so a denied
//! transition leaves no observable effect anywhere.

use crate::gate;
use crate::validator::{self, TransitionCheck};
use crate::{EngineError, EngineResult};
use chrono::Utc;
use convoy_storage::{ConvoyStorage, TransitionCommit};
use convoy_types::{
    states, Actor, ActorRole, AuditAction, AuditEntry, CheckpointEvent, EntityKind, FuelEvent,
    StateName, TenantId, Truck, TruckId,
};
use std::sync::Arc;

/// A requested truck transition.
#[derive(Clone, Debug)]
pub struct TransitionRequest {
    pub truck_id: TruckId,
    pub tenant_id: TenantId,
    pub requested: StateName,
    pub actor: Actor,
    pub notes: Option<String>,
}

/// Applies validated truck transitions against the store.
pub struct TruckStateController {
    storage: Arc<dyn ConvoyStorage>,
}

impl TruckStateController {
    pub fn new(storage: Arc<dyn ConvoyStorage>) -> Self {
        Self { storage }
    }

    /// Validate and apply a transition, returning the updated truck.
    ///
    /// Guard order: tenant config, truck load, mission-link invariant,
    /// driver approval, role gate, graph validation. A concurrent write
    /// between the read and the commit surfaces as `Conflict`.
    pub async fn transition(&self, request: TransitionRequest) -> EngineResult<Truck> {
        let config = self
            .storage
            .workflow_config(&request.tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("tenant not found".to_string()))?;

        let truck = self
            .storage
            .get_truck(&request.truck_id, &request.tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("truck not found".to_string()))?;

        let requested = request.requested.clone();
        if !config.contains_state(&requested) {
            return Err(EngineError::Validation(format!(
                "state {requested} is not in the tenant's configured state set"
            )));
        }

        // A truck moving into an active (on-mission) state must be linked
        // to a mission. Idle and the maintenance bay are off-mission.
        let off_mission = requested.is_idle() || requested == StateName::new(states::MAINTENANCE);
        if !off_mission && truck.mission_id.is_none() {
            return Err(EngineError::Validation(format!(
                "truck {} is not assigned to a mission",
                truck.id
            )));
        }

        if request.actor.role == ActorRole::Driver {
            if let Some(mission_id) = &truck.mission_id {
                let assignment = self
                    .storage
                    .get_assignment(mission_id, &request.actor.driver_id(), &request.tenant_id)
                    .await?;
                if !assignment.is_some_and(|a| a.is_approved()) {
                    return Err(EngineError::PermissionDenied(format!(
                        "driver {} has no approved assignment for mission {mission_id}",
                        request.actor.id
                    )));
                }
            }
        }

        let class = gate::transition_class(&config, &requested);
        gate::authorize_transition(request.actor.role, class, &truck.status, &requested)?;

        match validator::validate(&config, &truck.status, &requested) {
            TransitionCheck::Allowed => {}
            TransitionCheck::Denied { reason } => {
                return Err(EngineError::InvalidTransition(reason));
            }
        }

        let now = Utc::now();
        let mut after = truck.clone();
        after.status = requested.clone();
        after.version = truck.version + 1;
        after.updated_at = now;

        let audit = AuditEntry::record(
            request.tenant_id.clone(),
            EntityKind::Truck,
            truck.id.to_string(),
            AuditAction::StatusChanged,
            Some(&truck),
            Some(&after),
            request.actor.id.clone(),
            request.notes.clone(),
        )?;

        let checkpoint = config.checkpoint_for(&requested).map(|name| {
            CheckpointEvent::new(
                request.tenant_id.clone(),
                truck.id.clone(),
                truck.mission_id.clone(),
                name,
                requested.clone(),
            )
        });

        let fuel = config.emits_fuel_event(&requested).then(|| {
            FuelEvent::new(
                request.tenant_id.clone(),
                truck.id.clone(),
                truck.mission_id.clone(),
                requested.clone(),
                request.notes.clone(),
            )
        });

        let updated = self
            .storage
            .commit_transition(TransitionCommit {
                truck_id: truck.id.clone(),
                tenant_id: request.tenant_id.clone(),
                expected_version: truck.version,
                new_status: requested.clone(),
                updated_at: now,
                audit,
                checkpoint,
                fuel,
            })
            .await?;

        tracing::info!(
            truck = %updated.id,
            tenant = %updated.tenant_id,
            from = %truck.status,
            to = %updated.status,
            actor = %request.actor.id,
            "Truck transitioned"
        );

        Ok(updated)
    }
}
