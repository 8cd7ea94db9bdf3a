//! Checkpoint and fuel events
//!
//! Append-only records of physical occurrences, correlated with the state
//! transition that produced them. Written in the same storage commit as the
//! transition itself.

use crate::{MissionId, StateName, TenantId, TruckId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arrival of a truck at a named holding point.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckpointEvent {
    pub id: String,
    pub tenant_id: TenantId,
    pub truck_id: TruckId,
    pub mission_id: Option<MissionId>,
    /// Checkpoint name from the tenant configuration (e.g. "HP1").
    pub checkpoint: String,
    /// The state whose entry recorded this arrival.
    pub status: StateName,
    pub arrived_at: DateTime<Utc>,
}

impl CheckpointEvent {
    pub fn new(
        tenant_id: TenantId,
        truck_id: TruckId,
        mission_id: Option<MissionId>,
        checkpoint: impl Into<String>,
        status: StateName,
    ) -> Self {
        Self {
            id: format!("cp-{}", uuid::Uuid::new_v4()),
            tenant_id,
            truck_id,
            mission_id,
            checkpoint: checkpoint.into(),
            status,
            arrived_at: Utc::now(),
        }
    }
}

/// A fuel purchase recorded alongside a transition into a fueling state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FuelEvent {
    pub id: String,
    pub tenant_id: TenantId,
    pub truck_id: TruckId,
    pub mission_id: Option<MissionId>,
    /// The state whose entry recorded this purchase.
    pub status: StateName,
    /// Free-form notes from the transition request (station, litres, cost).
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl FuelEvent {
    pub fn new(
        tenant_id: TenantId,
        truck_id: TruckId,
        mission_id: Option<MissionId>,
        status: StateName,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: format!("fuel-{}", uuid::Uuid::new_v4()),
            tenant_id,
            truck_id,
            mission_id,
            status,
            notes,
            recorded_at: Utc::now(),
        }
    }
}
