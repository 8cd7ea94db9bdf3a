//! Trucks

use crate::{DriverId, MissionId, StateName, TenantId, TruckId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked aid truck.
///
/// The status is always a member of the owning tenant's configured state
/// set and is mutated only through the truck state controller. The version
/// counter backs optimistic concurrency: every committed write increments
/// it, and writes carry the version they read so concurrent updates fail
/// with a conflict instead of silently overwriting each other.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Truck {
    pub id: TruckId,
    pub tenant_id: TenantId,
    /// Plate number, unique within the tenant.
    pub plate: String,
    /// Cargo capacity in kilograms.
    pub capacity_kg: u32,
    pub status: StateName,
    pub mission_id: Option<MissionId>,
    pub driver_id: Option<DriverId>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Truck {
    /// Create a new truck in the initial `IDLE` status.
    pub fn new(tenant_id: TenantId, plate: impl Into<String>, capacity_kg: u32) -> Self {
        let now = Utc::now();
        Self {
            id: TruckId::generate(),
            tenant_id,
            plate: plate.into(),
            capacity_kg,
            status: StateName::idle(),
            mission_id: None,
            driver_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status.is_idle()
    }
}
