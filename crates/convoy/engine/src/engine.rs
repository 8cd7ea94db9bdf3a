//! The engine facade
//!
//! `LogisticsEngine` bundles the controller, the approval workflow, and the
//! audit surface over one shared store. This is the internal contract the
//! transport layer (out of scope here) calls into; every operation is
//! transport-independent and tenant-scoped.

use crate::approvals::{AssignmentOutcome, BatchOutcome, MissionApprovalService};
use crate::audit_log::{AuditLog, AuditQuery, AuditStatistics};
use crate::controller::{TransitionRequest, TruckStateController};
use crate::{default_workflow_config, EngineError, EngineResult};
use chrono::Utc;
use convoy_storage::memory::InMemoryConvoyStorage;
use convoy_storage::{ConvoyStorage, EventFilter, QueryWindow};
use convoy_types::{
    Actor, AssignmentStatus, AuditAction, AuditEntry, CheckpointEvent, DriverId, EntityKind,
    FuelEvent, Mission, MissionDriverAssignment, MissionId, MissionStatus, Tenant, TenantId,
    TenantWorkflowConfig, Truck, TruckId,
};
use std::sync::Arc;

/// The logistics workflow engine.
pub struct LogisticsEngine {
    storage: Arc<dyn ConvoyStorage>,
    controller: TruckStateController,
    approvals: MissionApprovalService,
    audit: AuditLog,
}

impl LogisticsEngine {
    /// Create an engine backed by the in-memory store.
    pub fn new() -> Self {
        Self::with_storage(Arc::new(InMemoryConvoyStorage::new()))
    }

    /// Create an engine backed by an explicit storage adapter.
    pub fn with_storage(storage: Arc<dyn ConvoyStorage>) -> Self {
        Self {
            controller: TruckStateController::new(Arc::clone(&storage)),
            approvals: MissionApprovalService::new(Arc::clone(&storage)),
            audit: AuditLog::new(Arc::clone(&storage)),
            storage,
        }
    }

    /// Access the underlying storage backend.
    pub fn storage(&self) -> Arc<dyn ConvoyStorage> {
        Arc::clone(&self.storage)
    }

    // ── Tenants and workflow configuration ───────────────────────────

    /// Create a tenant seeded with a deep copy of the default workflow
    /// configuration.
    pub async fn create_tenant(&self, name: &str, actor: &Actor) -> EngineResult<Tenant> {
        let tenant = Tenant::new(name, default_workflow_config().clone());
        let audit = AuditEntry::record(
            tenant.id.clone(),
            EntityKind::Tenant,
            tenant.id.to_string(),
            AuditAction::Created,
            None::<&Tenant>,
            Some(&tenant),
            actor.id.clone(),
            None,
        )?;
        self.storage.create_tenant(tenant.clone(), audit).await?;

        tracing::info!(tenant = %tenant.id, name = %tenant.name, "Tenant created");
        Ok(tenant)
    }

    pub async fn tenant_workflow_config(
        &self,
        tenant_id: &TenantId,
    ) -> EngineResult<TenantWorkflowConfig> {
        self.storage
            .workflow_config(tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("tenant not found".to_string()))
    }

    /// Replace a tenant's workflow configuration after validating its
    /// structural invariants.
    pub async fn set_tenant_workflow_config(
        &self,
        tenant_id: &TenantId,
        config: TenantWorkflowConfig,
        actor: &Actor,
    ) -> EngineResult<()> {
        config
            .validate()
            .map_err(|err| EngineError::Validation(err.to_string()))?;

        let previous = self.tenant_workflow_config(tenant_id).await?;
        let audit = AuditEntry::record(
            tenant_id.clone(),
            EntityKind::WorkflowConfig,
            tenant_id.to_string(),
            AuditAction::ConfigUpdated,
            Some(&previous),
            Some(&config),
            actor.id.clone(),
            None,
        )?;
        self.storage
            .set_workflow_config(tenant_id, config, audit)
            .await?;

        tracing::info!(tenant = %tenant_id, "Workflow configuration updated");
        Ok(())
    }

    // ── Trucks ───────────────────────────────────────────────────────

    /// Register a truck for a tenant. Plates are unique within a tenant.
    pub async fn create_truck(
        &self,
        tenant_id: &TenantId,
        plate: &str,
        capacity_kg: u32,
        actor: &Actor,
    ) -> EngineResult<Truck> {
        if plate.trim().is_empty() {
            return Err(EngineError::Validation(
                "plate number must not be empty".to_string(),
            ));
        }
        self.storage
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("tenant not found".to_string()))?;

        let truck = Truck::new(tenant_id.clone(), plate.trim(), capacity_kg);
        let audit = AuditEntry::record(
            tenant_id.clone(),
            EntityKind::Truck,
            truck.id.to_string(),
            AuditAction::Created,
            None::<&Truck>,
            Some(&truck),
            actor.id.clone(),
            None,
        )?;
        self.storage.insert_truck(truck.clone(), audit).await?;

        tracing::info!(truck = %truck.id, tenant = %tenant_id, plate = %truck.plate, "Truck created");
        Ok(truck)
    }

    pub async fn truck(&self, truck_id: &TruckId, tenant_id: &TenantId) -> EngineResult<Truck> {
        self.storage
            .get_truck(truck_id, tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("truck not found".to_string()))
    }

    pub async fn trucks(&self, tenant_id: &TenantId) -> EngineResult<Vec<Truck>> {
        Ok(self
            .storage
            .list_trucks(tenant_id, QueryWindow::default())
            .await?)
    }

    /// Link an idle truck to a mission, optionally with a driver.
    pub async fn assign_truck(
        &self,
        truck_id: &TruckId,
        tenant_id: &TenantId,
        mission_id: &MissionId,
        driver_id: Option<DriverId>,
        actor: &Actor,
    ) -> EngineResult<Truck> {
        let truck = self.truck(truck_id, tenant_id).await?;
        if !truck.is_idle() {
            return Err(EngineError::Conflict(format!(
                "truck {} is {}; only idle trucks can be reassigned",
                truck.id, truck.status
            )));
        }

        let mission = self
            .storage
            .get_mission(mission_id, tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("mission not found".to_string()))?;
        if mission.status.is_terminal() {
            return Err(EngineError::Conflict(format!(
                "mission {} is {}; trucks cannot be assigned to it",
                mission.id, mission.status
            )));
        }

        let mut after = truck.clone();
        after.mission_id = Some(mission_id.clone());
        after.driver_id = driver_id.clone();
        after.version = truck.version + 1;

        let audit = AuditEntry::record(
            tenant_id.clone(),
            EntityKind::Truck,
            truck.id.to_string(),
            AuditAction::TruckAssigned,
            Some(&truck),
            Some(&after),
            actor.id.clone(),
            None,
        )?;
        let updated = self
            .storage
            .set_truck_links(
                truck_id,
                tenant_id,
                truck.version,
                Some(mission_id.clone()),
                driver_id,
                Utc::now(),
                audit,
            )
            .await?;

        tracing::info!(truck = %truck_id, mission = %mission_id, "Truck assigned to mission");
        Ok(updated)
    }

    /// Validate and apply a truck state transition.
    pub async fn transition(&self, request: TransitionRequest) -> EngineResult<Truck> {
        self.controller.transition(request).await
    }

    // ── Missions ─────────────────────────────────────────────────────

    pub async fn create_mission(
        &self,
        tenant_id: &TenantId,
        name: &str,
        actor: &Actor,
    ) -> EngineResult<Mission> {
        self.storage
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("tenant not found".to_string()))?;

        let mission = Mission::new(tenant_id.clone(), name);
        let audit = AuditEntry::record(
            tenant_id.clone(),
            EntityKind::Mission,
            mission.id.to_string(),
            AuditAction::Created,
            None::<&Mission>,
            Some(&mission),
            actor.id.clone(),
            None,
        )?;
        self.storage.insert_mission(mission.clone(), audit).await?;

        tracing::info!(mission = %mission.id, tenant = %tenant_id, "Mission created");
        Ok(mission)
    }

    pub async fn mission(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
    ) -> EngineResult<Mission> {
        self.storage
            .get_mission(mission_id, tenant_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("mission not found".to_string()))
    }

    /// Advance a mission through its planning lifecycle.
    pub async fn update_mission_status(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
        new_status: MissionStatus,
        actor: &Actor,
    ) -> EngineResult<Mission> {
        let mission = self.mission(mission_id, tenant_id).await?;
        if !mission.status.can_transition_to(new_status) {
            return Err(EngineError::InvalidTransition(format!(
                "Invalid transition from {} to {}",
                mission.status, new_status
            )));
        }

        let mut after = mission.clone();
        after.status = new_status;
        after.version = mission.version + 1;

        let audit = AuditEntry::record(
            tenant_id.clone(),
            EntityKind::Mission,
            mission.id.to_string(),
            AuditAction::StatusChanged,
            Some(&mission),
            Some(&after),
            actor.id.clone(),
            None,
        )?;
        let updated = self
            .storage
            .update_mission_status(
                mission_id,
                tenant_id,
                mission.version,
                new_status,
                Utc::now(),
                audit,
            )
            .await?;

        tracing::info!(mission = %mission_id, status = %updated.status, "Mission status changed");
        Ok(updated)
    }

    // ── Mission-driver approvals ─────────────────────────────────────

    pub async fn assign_drivers(
        &self,
        mission_id: &MissionId,
        driver_ids: &[DriverId],
        tenant_id: &TenantId,
        actor: &Actor,
    ) -> EngineResult<Vec<AssignmentOutcome>> {
        self.approvals
            .assign_drivers(mission_id, driver_ids, tenant_id, actor)
            .await
    }

    pub async fn update_assignment_status(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
        new_status: AssignmentStatus,
        actor: &Actor,
    ) -> EngineResult<MissionDriverAssignment> {
        self.approvals
            .update_status(mission_id, driver_id, tenant_id, new_status, actor)
            .await
    }

    pub async fn bulk_update_assignment_status(
        &self,
        mission_id: &MissionId,
        driver_ids: &[DriverId],
        tenant_id: &TenantId,
        new_status: AssignmentStatus,
        actor: &Actor,
    ) -> EngineResult<Vec<BatchOutcome>> {
        self.approvals
            .bulk_update_status(mission_id, driver_ids, tenant_id, new_status, actor)
            .await
    }

    pub async fn remove_assignment(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
        actor: &Actor,
    ) -> EngineResult<()> {
        self.approvals
            .remove(mission_id, driver_id, tenant_id, actor)
            .await
    }

    pub async fn assignments(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
    ) -> EngineResult<Vec<MissionDriverAssignment>> {
        Ok(self.storage.list_assignments(mission_id, tenant_id).await?)
    }

    // ── Audit and physical events ────────────────────────────────────

    pub async fn audit_history(
        &self,
        tenant_id: &TenantId,
        query: AuditQuery,
    ) -> EngineResult<Vec<AuditEntry>> {
        self.audit.history(tenant_id, query).await
    }

    pub async fn audit_statistics(&self, tenant_id: &TenantId) -> EngineResult<AuditStatistics> {
        self.audit.statistics(tenant_id).await
    }

    pub async fn checkpoint_events(
        &self,
        tenant_id: &TenantId,
        filter: EventFilter,
    ) -> EngineResult<Vec<CheckpointEvent>> {
        Ok(self
            .storage
            .list_checkpoint_events(tenant_id, filter)
            .await?)
    }

    pub async fn fuel_events(
        &self,
        tenant_id: &TenantId,
        filter: EventFilter,
    ) -> EngineResult<Vec<FuelEvent>> {
        Ok(self.storage.list_fuel_events(tenant_id, filter).await?)
    }
}

impl Default for LogisticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
