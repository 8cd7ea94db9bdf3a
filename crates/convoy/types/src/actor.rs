//! Acting users and their operational roles

use crate::{ActorId, DriverId};
use serde::{Deserialize, Serialize};

/// Operational role of an acting user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Drives trucks; may only act on missions with an approved assignment.
    Driver,
    /// Coordinates trucks and missions for a tenant.
    Dispatcher,
    /// Elevated role; the only role that may apply Green-Light transitions.
    OperationsManager,
    /// Workshop staff; limited to moves into and out of the maintenance bay.
    Maintenance,
    /// Contractor liaison; standard transitions on the contractor's trucks.
    ContractorFocalPoint,
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Driver => "driver",
            Self::Dispatcher => "dispatcher",
            Self::OperationsManager => "operations_manager",
            Self::Maintenance => "maintenance",
            Self::ContractorFocalPoint => "contractor_focal_point",
        };
        write!(f, "{label}")
    }
}

/// An authenticated acting user as seen by the engine.
///
/// Authentication itself is an external collaborator; the engine trusts the
/// (id, role) pair handed to it by the calling layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id: ActorId::new(id),
            role,
        }
    }

    /// Driver actors are identified by their driver profile id.
    pub fn driver_id(&self) -> DriverId {
        DriverId::new(self.id.as_str())
    }
}
