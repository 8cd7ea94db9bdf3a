//! In-memory reference implementation for the convoy storage traits.
//!
//! Deterministic and test-friendly. Lock acquisition order is fixed
//! (entity map, then audit log, then event logs) and every commit validates
//! before it mutates, so a failed operation leaves nothing behind.

use crate::model::{AuditFilter, EventFilter, TransitionCommit};
use crate::traits::{
    AssignmentStore, AuditStore, EventStore, MissionStore, QueryWindow, TenantStore, TruckStore,
};
use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use convoy_types::{
    AssignmentStatus, AuditEntry, CheckpointEvent, DriverId, FuelEvent, Mission,
    MissionDriverAssignment, MissionId, MissionStatus, Tenant, TenantId, TenantWorkflowConfig,
    Truck, TruckId,
};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory convoy storage adapter.
#[derive(Default)]
pub struct InMemoryConvoyStorage {
    tenants: RwLock<HashMap<TenantId, Tenant>>,
    trucks: RwLock<HashMap<TruckId, Truck>>,
    missions: RwLock<HashMap<MissionId, Mission>>,
    assignments: RwLock<HashMap<(MissionId, DriverId), MissionDriverAssignment>>,
    audits: RwLock<Vec<AuditEntry>>,
    checkpoint_events: RwLock<Vec<CheckpointEvent>>,
    fuel_events: RwLock<Vec<FuelEvent>>,
}

impl InMemoryConvoyStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(which: &str) -> StorageError {
    StorageError::Backend(format!("{which} lock poisoned"))
}

fn apply_window<T>(items: Vec<T>, window: QueryWindow) -> Vec<T> {
    let iter = items.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}

#[async_trait]
impl TenantStore for InMemoryConvoyStorage {
    async fn create_tenant(&self, tenant: Tenant, audit: AuditEntry) -> StorageResult<()> {
        let mut tenants = self.tenants.write().map_err(|_| poisoned("tenants"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        if tenants.contains_key(&tenant.id) {
            return Err(StorageError::Conflict(format!(
                "tenant {} already exists",
                tenant.id
            )));
        }

        tenants.insert(tenant.id.clone(), tenant);
        audits.push(audit);
        Ok(())
    }

    async fn get_tenant(&self, tenant_id: &TenantId) -> StorageResult<Option<Tenant>> {
        let tenants = self.tenants.read().map_err(|_| poisoned("tenants"))?;
        Ok(tenants.get(tenant_id).cloned())
    }

    async fn workflow_config(
        &self,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<TenantWorkflowConfig>> {
        let tenants = self.tenants.read().map_err(|_| poisoned("tenants"))?;
        Ok(tenants
            .get(tenant_id)
            .map(|tenant| tenant.workflow_config.clone()))
    }

    async fn set_workflow_config(
        &self,
        tenant_id: &TenantId,
        config: TenantWorkflowConfig,
        audit: AuditEntry,
    ) -> StorageResult<()> {
        let mut tenants = self.tenants.write().map_err(|_| poisoned("tenants"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        let tenant = tenants
            .get_mut(tenant_id)
            .ok_or_else(|| StorageError::NotFound(format!("tenant {tenant_id} not found")))?;
        tenant.workflow_config = config;
        tenant.updated_at = Utc::now();
        audits.push(audit);
        Ok(())
    }
}

#[async_trait]
impl TruckStore for InMemoryConvoyStorage {
    async fn insert_truck(&self, truck: Truck, audit: AuditEntry) -> StorageResult<()> {
        let mut trucks = self.trucks.write().map_err(|_| poisoned("trucks"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        let plate_taken = trucks
            .values()
            .any(|t| t.tenant_id == truck.tenant_id && t.plate == truck.plate);
        if plate_taken {
            return Err(StorageError::Conflict(format!(
                "plate {} already registered for tenant {}",
                truck.plate, truck.tenant_id
            )));
        }
        if trucks.contains_key(&truck.id) {
            return Err(StorageError::Conflict(format!(
                "truck {} already exists",
                truck.id
            )));
        }

        trucks.insert(truck.id.clone(), truck);
        audits.push(audit);
        Ok(())
    }

    async fn get_truck(
        &self,
        truck_id: &TruckId,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<Truck>> {
        let trucks = self.trucks.read().map_err(|_| poisoned("trucks"))?;
        Ok(trucks
            .get(truck_id)
            .filter(|truck| &truck.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_trucks(
        &self,
        tenant_id: &TenantId,
        window: QueryWindow,
    ) -> StorageResult<Vec<Truck>> {
        let trucks = self.trucks.read().map_err(|_| poisoned("trucks"))?;
        let mut values = trucks
            .values()
            .filter(|truck| &truck.tenant_id == tenant_id)
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(apply_window(values, window))
    }

    async fn set_truck_links(
        &self,
        truck_id: &TruckId,
        tenant_id: &TenantId,
        expected_version: u64,
        mission_id: Option<MissionId>,
        driver_id: Option<DriverId>,
        updated_at: DateTime<Utc>,
        audit: AuditEntry,
    ) -> StorageResult<Truck> {
        let mut trucks = self.trucks.write().map_err(|_| poisoned("trucks"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        let truck = trucks
            .get_mut(truck_id)
            .filter(|truck| &truck.tenant_id == tenant_id)
            .ok_or_else(|| StorageError::NotFound(format!("truck {truck_id} not found")))?;

        if truck.version != expected_version {
            return Err(StorageError::Conflict(format!(
                "truck {} version {} does not match expected {}",
                truck_id, truck.version, expected_version
            )));
        }

        truck.mission_id = mission_id;
        truck.driver_id = driver_id;
        truck.version += 1;
        truck.updated_at = updated_at;
        let updated = truck.clone();
        audits.push(audit);
        Ok(updated)
    }

    async fn commit_transition(&self, commit: TransitionCommit) -> StorageResult<Truck> {
        let mut trucks = self.trucks.write().map_err(|_| poisoned("trucks"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;
        let mut checkpoints = self
            .checkpoint_events
            .write()
            .map_err(|_| poisoned("checkpoint events"))?;
        let mut fuels = self
            .fuel_events
            .write()
            .map_err(|_| poisoned("fuel events"))?;

        let truck = trucks
            .get_mut(&commit.truck_id)
            .filter(|truck| truck.tenant_id == commit.tenant_id)
            .ok_or_else(|| {
                StorageError::NotFound(format!("truck {} not found", commit.truck_id))
            })?;

        if truck.version != commit.expected_version {
            return Err(StorageError::Conflict(format!(
                "truck {} version {} does not match expected {}",
                commit.truck_id, truck.version, commit.expected_version
            )));
        }

        truck.status = commit.new_status;
        truck.version += 1;
        truck.updated_at = commit.updated_at;
        let updated = truck.clone();

        audits.push(commit.audit);
        if let Some(event) = commit.checkpoint {
            checkpoints.push(event);
        }
        if let Some(event) = commit.fuel {
            fuels.push(event);
        }

        Ok(updated)
    }

    async fn trucks_for_assignment(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
    ) -> StorageResult<Vec<Truck>> {
        let trucks = self.trucks.read().map_err(|_| poisoned("trucks"))?;
        Ok(trucks
            .values()
            .filter(|truck| {
                &truck.tenant_id == tenant_id
                    && truck.mission_id.as_ref() == Some(mission_id)
                    && truck.driver_id.as_ref() == Some(driver_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MissionStore for InMemoryConvoyStorage {
    async fn insert_mission(&self, mission: Mission, audit: AuditEntry) -> StorageResult<()> {
        let mut missions = self.missions.write().map_err(|_| poisoned("missions"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        if missions.contains_key(&mission.id) {
            return Err(StorageError::Conflict(format!(
                "mission {} already exists",
                mission.id
            )));
        }

        missions.insert(mission.id.clone(), mission);
        audits.push(audit);
        Ok(())
    }

    async fn get_mission(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<Mission>> {
        let missions = self.missions.read().map_err(|_| poisoned("missions"))?;
        Ok(missions
            .get(mission_id)
            .filter(|mission| &mission.tenant_id == tenant_id)
            .cloned())
    }

    async fn update_mission_status(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
        expected_version: u64,
        new_status: MissionStatus,
        updated_at: DateTime<Utc>,
        audit: AuditEntry,
    ) -> StorageResult<Mission> {
        let mut missions = self.missions.write().map_err(|_| poisoned("missions"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        let mission = missions
            .get_mut(mission_id)
            .filter(|mission| &mission.tenant_id == tenant_id)
            .ok_or_else(|| StorageError::NotFound(format!("mission {mission_id} not found")))?;

        if mission.version != expected_version {
            return Err(StorageError::Conflict(format!(
                "mission {} version {} does not match expected {}",
                mission_id, mission.version, expected_version
            )));
        }

        mission.status = new_status;
        mission.version += 1;
        mission.updated_at = updated_at;
        let updated = mission.clone();
        audits.push(audit);
        Ok(updated)
    }
}

#[async_trait]
impl AssignmentStore for InMemoryConvoyStorage {
    async fn insert_assignment(
        &self,
        assignment: MissionDriverAssignment,
        audit: AuditEntry,
    ) -> StorageResult<()> {
        let mut assignments = self
            .assignments
            .write()
            .map_err(|_| poisoned("assignments"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        let key = (assignment.mission_id.clone(), assignment.driver_id.clone());
        if assignments.contains_key(&key) {
            return Err(StorageError::Conflict(format!(
                "driver {} already assigned to mission {}",
                assignment.driver_id, assignment.mission_id
            )));
        }

        assignments.insert(key, assignment);
        audits.push(audit);
        Ok(())
    }

    async fn get_assignment(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
    ) -> StorageResult<Option<MissionDriverAssignment>> {
        let assignments = self.assignments.read().map_err(|_| poisoned("assignments"))?;
        Ok(assignments
            .get(&(mission_id.clone(), driver_id.clone()))
            .filter(|assignment| &assignment.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_assignments(
        &self,
        mission_id: &MissionId,
        tenant_id: &TenantId,
    ) -> StorageResult<Vec<MissionDriverAssignment>> {
        let assignments = self.assignments.read().map_err(|_| poisoned("assignments"))?;
        let mut values = assignments
            .values()
            .filter(|assignment| {
                &assignment.mission_id == mission_id && &assignment.tenant_id == tenant_id
            })
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at));
        Ok(values)
    }

    async fn update_assignment(
        &self,
        expected_status: AssignmentStatus,
        updated: MissionDriverAssignment,
        audit: AuditEntry,
    ) -> StorageResult<MissionDriverAssignment> {
        let mut assignments = self
            .assignments
            .write()
            .map_err(|_| poisoned("assignments"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        let key = (updated.mission_id.clone(), updated.driver_id.clone());
        let current = assignments
            .get_mut(&key)
            .filter(|assignment| assignment.tenant_id == updated.tenant_id)
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "assignment for driver {} on mission {} not found",
                    updated.driver_id, updated.mission_id
                ))
            })?;

        if current.status != expected_status {
            return Err(StorageError::Conflict(format!(
                "assignment status is {}, expected {}",
                current.status, expected_status
            )));
        }

        *current = updated.clone();
        audits.push(audit);
        Ok(updated)
    }

    async fn delete_assignment(
        &self,
        mission_id: &MissionId,
        driver_id: &DriverId,
        tenant_id: &TenantId,
        audit: AuditEntry,
    ) -> StorageResult<()> {
        let mut assignments = self
            .assignments
            .write()
            .map_err(|_| poisoned("assignments"))?;
        let mut audits = self.audits.write().map_err(|_| poisoned("audits"))?;

        let key = (mission_id.clone(), driver_id.clone());
        let exists = assignments
            .get(&key)
            .is_some_and(|assignment| &assignment.tenant_id == tenant_id);
        if !exists {
            return Err(StorageError::NotFound(format!(
                "assignment for driver {driver_id} on mission {mission_id} not found"
            )));
        }

        assignments.remove(&key);
        audits.push(audit);
        Ok(())
    }
}

#[async_trait]
impl AuditStore for InMemoryConvoyStorage {
    async fn list_audit(
        &self,
        tenant_id: &TenantId,
        filter: AuditFilter,
        window: QueryWindow,
    ) -> StorageResult<Vec<AuditEntry>> {
        let audits = self.audits.read().map_err(|_| poisoned("audits"))?;
        let values = audits
            .iter()
            .filter(|entry| &entry.tenant_id == tenant_id)
            .filter(|entry| {
                filter
                    .entity_kind
                    .is_none_or(|kind| entry.entity_kind == kind)
            })
            .filter(|entry| {
                filter
                    .entity_id
                    .as_ref()
                    .is_none_or(|id| &entry.entity_id == id)
            })
            .filter(|entry| filter.from.is_none_or(|from| entry.recorded_at >= from))
            .filter(|entry| filter.to.is_none_or(|to| entry.recorded_at <= to))
            .cloned()
            .collect::<Vec<_>>();
        Ok(apply_window(values, window))
    }
}

#[async_trait]
impl EventStore for InMemoryConvoyStorage {
    async fn list_checkpoint_events(
        &self,
        tenant_id: &TenantId,
        filter: EventFilter,
    ) -> StorageResult<Vec<CheckpointEvent>> {
        let events = self
            .checkpoint_events
            .read()
            .map_err(|_| poisoned("checkpoint events"))?;
        Ok(events
            .iter()
            .filter(|event| &event.tenant_id == tenant_id)
            .filter(|event| {
                filter
                    .truck_id
                    .as_ref()
                    .is_none_or(|id| &event.truck_id == id)
            })
            .filter(|event| {
                filter
                    .mission_id
                    .as_ref()
                    .is_none_or(|id| event.mission_id.as_ref() == Some(id))
            })
            .cloned()
            .collect())
    }

    async fn list_fuel_events(
        &self,
        tenant_id: &TenantId,
        filter: EventFilter,
    ) -> StorageResult<Vec<FuelEvent>> {
        let events = self
            .fuel_events
            .read()
            .map_err(|_| poisoned("fuel events"))?;
        Ok(events
            .iter()
            .filter(|event| &event.tenant_id == tenant_id)
            .filter(|event| {
                filter
                    .truck_id
                    .as_ref()
                    .is_none_or(|id| &event.truck_id == id)
            })
            .filter(|event| {
                filter
                    .mission_id
                    .as_ref()
                    .is_none_or(|id| event.mission_id.as_ref() == Some(id))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_types::{ActorId, AuditAction, EntityKind, StateName};
    use std::collections::BTreeMap;

    fn config() -> TenantWorkflowConfig {
        TenantWorkflowConfig {
            states: vec![StateName::new("IDLE"), StateName::new("DISPATCHED")],
            transitions: BTreeMap::new(),
            green_light_states: Vec::new(),
            checkpoints: BTreeMap::new(),
            fuel_states: Vec::new(),
        }
    }

    fn creation_audit(tenant_id: &TenantId, kind: EntityKind, entity_id: String) -> AuditEntry {
        AuditEntry::record(
            tenant_id.clone(),
            kind,
            entity_id,
            AuditAction::Created,
            None::<&Truck>,
            None::<&Truck>,
            ActorId::new("test"),
            None,
        )
        .unwrap()
    }

    async fn seeded_truck(storage: &InMemoryConvoyStorage) -> Truck {
        let tenant = Tenant::new("Relief Org", config());
        let tenant_id = tenant.id.clone();
        let audit = creation_audit(&tenant_id, EntityKind::Tenant, tenant_id.to_string());
        storage.create_tenant(tenant, audit).await.unwrap();

        let truck = Truck::new(tenant_id.clone(), "AA-100", 10_000);
        let audit = creation_audit(&tenant_id, EntityKind::Truck, truck.id.to_string());
        storage.insert_truck(truck.clone(), audit).await.unwrap();
        truck
    }

    #[tokio::test]
    async fn duplicate_plate_within_tenant_is_a_conflict() {
        let storage = InMemoryConvoyStorage::new();
        let truck = seeded_truck(&storage).await;

        let duplicate = Truck::new(truck.tenant_id.clone(), "AA-100", 5_000);
        let audit = creation_audit(
            &truck.tenant_id,
            EntityKind::Truck,
            duplicate.id.to_string(),
        );
        let result = storage.insert_truck(duplicate, audit).await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
    }

    #[tokio::test]
    async fn cross_tenant_reads_see_nothing() {
        let storage = InMemoryConvoyStorage::new();
        let truck = seeded_truck(&storage).await;

        let other = TenantId::new("someone-else");
        let found = storage.get_truck(&truck.id, &other).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn commit_transition_checks_version() {
        let storage = InMemoryConvoyStorage::new();
        let truck = seeded_truck(&storage).await;

        let audit = creation_audit(&truck.tenant_id, EntityKind::Truck, truck.id.to_string());
        let stale = TransitionCommit {
            truck_id: truck.id.clone(),
            tenant_id: truck.tenant_id.clone(),
            expected_version: truck.version + 1,
            new_status: StateName::new("DISPATCHED"),
            updated_at: Utc::now(),
            audit,
            checkpoint: None,
            fuel: None,
        };
        let result = storage.commit_transition(stale).await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));

        // Stored truck is untouched by the failed commit.
        let stored = storage
            .get_truck(&truck.id, &truck.tenant_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, StateName::idle());
        assert_eq!(stored.version, truck.version);
    }

    #[tokio::test]
    async fn commit_transition_applies_status_audit_and_events_together() {
        let storage = InMemoryConvoyStorage::new();
        let truck = seeded_truck(&storage).await;

        let audit = creation_audit(&truck.tenant_id, EntityKind::Truck, truck.id.to_string());
        let checkpoint = CheckpointEvent::new(
            truck.tenant_id.clone(),
            truck.id.clone(),
            None,
            "HP1",
            StateName::new("HP1_WAIT"),
        );
        let commit = TransitionCommit {
            truck_id: truck.id.clone(),
            tenant_id: truck.tenant_id.clone(),
            expected_version: truck.version,
            new_status: StateName::new("HP1_WAIT"),
            updated_at: Utc::now(),
            audit,
            checkpoint: Some(checkpoint),
            fuel: None,
        };
        let updated = storage.commit_transition(commit).await.unwrap();
        assert_eq!(updated.status, StateName::new("HP1_WAIT"));
        assert_eq!(updated.version, truck.version + 1);

        let events = storage
            .list_checkpoint_events(&truck.tenant_id, EventFilter::default())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].checkpoint, "HP1");
    }

    #[tokio::test]
    async fn assignment_update_is_compare_on_status() {
        let storage = InMemoryConvoyStorage::new();
        let tenant = Tenant::new("Relief Org", config());
        let tenant_id = tenant.id.clone();
        let audit = creation_audit(&tenant_id, EntityKind::Tenant, tenant_id.to_string());
        storage.create_tenant(tenant, audit).await.unwrap();

        let assignment = MissionDriverAssignment::new(
            MissionId::new("m1"),
            DriverId::new("d1"),
            tenant_id.clone(),
            ActorId::new("dispatcher-1"),
        );
        let audit = creation_audit(
            &tenant_id,
            EntityKind::MissionDriverAssignment,
            "m1/d1".to_string(),
        );
        storage.insert_assignment(assignment.clone(), audit).await.unwrap();

        let mut updated = assignment.clone();
        updated.status = AssignmentStatus::Approved;
        let audit = creation_audit(
            &tenant_id,
            EntityKind::MissionDriverAssignment,
            "m1/d1".to_string(),
        );
        let result = storage
            .update_assignment(AssignmentStatus::Denied, updated, audit)
            .await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
    }
}
