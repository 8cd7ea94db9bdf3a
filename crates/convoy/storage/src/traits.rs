use crate::model::{AuditFilter, EventFilter, TransitionCommit};
use crate::StorageResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use convoy_types::{
    AssignmentStatus, AuditEntry, CheckpointEvent, DriverId, FuelEvent, Mission,
    MissionDriverAssignment, MissionId, MissionStatus, Tenant, TenantId, TenantWorkflowConfig,
    Truck, TruckId,
};

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryWindow {
    /// Maximum records to return; 0 means unbounded.
    pub limit: usize,
    pub offset: usize,
}

/// Storage interface for tenants and their workflow configuration.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Insert a new tenant with its seeded workflow configuration, together
    /// with the audit entry recording the creation.
    async fn create_tenant(&self, tenant: Tenant, audit: AuditEntry) -> StorageResult<()>;

    async fn get_tenant(&self, tenant_id: &TenantId) -> StorageResult<Option<Tenant>>;

    async fn workflow_config(
        &self,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<TenantWorkflowConfig>>;

    /// Replace the tenant's workflow configuration.
    async fn set_workflow_config(
        &self,
        tenant_id: &TenantId,
        config: TenantWorkflowConfig,
        audit: AuditEntry,
    ) -> StorageResult<()>;
}

/// Storage interface for trucks.
#[async_trait]
pub trait TruckStore: Send + Sync {
    /// Insert a truck. Fails with a conflict if the plate is already taken
    /// within the tenant.
    async fn insert_truck(&self, truck: Truck, audit: AuditEntry) -> StorageResult<()>;

    /// Tenant-scoped read. A tenant mismatch reads as absent.
    async fn get_truck(
        &self,
        truck_id: &TruckId,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<Truck>>;

    async fn list_trucks(
        &self,
        tenant_id: &TenantId,
        window: QueryWindow,
    ) -> StorageResult<Vec<Truck>>;

    /// Link a truck to a mission (and optionally a driver), compare-on-version.
    async fn set_truck_links(
        &self,
        truck_id: &TruckId,
        tenant_id: &TenantId,
        expected_version: u64,
        mission_id: Option<MissionId>,
        driver_id: Option<DriverId>,
        updated_at: DateTime<Utc>,
        audit: AuditEntry,
    ) -> StorageResult<Truck>;

    /// Apply a validated transition atomically: status write (compare-on-
    /// version), audit entry, and any checkpoint/fuel event. Returns the
    /// updated truck. No partial effects on failure.
    async fn commit_transition(&self, commit: TransitionCommit) -> StorageResult<Truck>;

    /// All trucks linked to the given (mission, driver) pair.
    async fn trucks_for_assignment(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
    ) -> StorageResult<Vec<Truck>>;
}

/// Storage interface for missions.
#[async_trait]
pub trait MissionStore: Send + Sync {
    async fn insert_mission(&self, mission: Mission, audit: AuditEntry) -> StorageResult<()>;

    async fn get_mission(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<Mission>>;

    /// Compare-on-version mission status write.
    async fn update_mission_status(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
        expected_version: u64,
        new_status: MissionStatus,
        updated_at: DateTime<Utc>,
        audit: AuditEntry,
    ) -> StorageResult<Mission>;
}

/// Storage interface for mission-driver assignments.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Insert a new assignment. Fails with a conflict if the
    /// (mission, driver) pair already has one.
    async fn insert_assignment(
        &self,
        assignment: MissionDriverAssignment,
        audit: AuditEntry,
    ) -> StorageResult<()>;

    async fn get_assignment(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<MissionDriverAssignment>>;

    async fn list_assignments(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
    ) -> StorageResult<Vec<MissionDriverAssignment>>;

    /// Replace an assignment whose stored status still equals
    /// `expected_status`; stale writes fail with a conflict.
    async fn update_assignment(
        &self,
        expected_status: AssignmentStatus,
        updated: MissionDriverAssignment,
        audit: AuditEntry,
    ) -> StorageResult<MissionDriverAssignment>;

    async fn delete_assignment(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
        audit: AuditEntry,
    ) -> StorageResult<()>;
}

/// Storage interface for the append-only audit log.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Read entries in append order (oldest first); callers choose the
    /// presentation order.
    async fn list_audit(
        &self,
        tenant_id: &TenantId,
        filter: AuditFilter,
        window: QueryWindow,
    ) -> StorageResult<Vec<AuditEntry>>;
}

/// Storage interface for checkpoint and fuel events. Events are appended
/// only as part of a [`TransitionCommit`]; reads are append-order.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list_checkpoint_events(
        &self,
        tenant_id: &TenantId,
        filter: EventFilter,
    ) -> StorageResult<Vec<CheckpointEvent>>;

    async fn list_fuel_events(
        &self,
        tenant_id: &TenantId,
        filter: EventFilter,
    ) -> StorageResult<Vec<FuelEvent>>;
}

/// Unified storage bundle the engine runs against.
pub trait ConvoyStorage:
    TenantStore + TruckStore + MissionStore + AssignmentStore + AuditStore + EventStore + Send + Sync
{
}

impl<T> ConvoyStorage for T where
    T: TenantStore
        + TruckStore
        + MissionStore
        + AssignmentStore
        + AuditStore
        + EventStore
        + Send
        + Sync
{
}
