//! Role gate
//!
//! Authorization predicate evaluated before a transition or approval is
//! accepted. Authorization failure is reported as `PermissionDenied`,
//! distinct from transition-invalidity, so callers can tell "not allowed to
//! do this" from "this move is illegal regardless of who asks".

use crate::{EngineError, EngineResult};
use convoy_types::{states, ActorRole, StateName, TenantWorkflowConfig};

/// Class of a requested transition, derived from the tenant configuration
/// and the state being entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionClass {
    /// Ordinary move through the graph.
    Standard,
    /// Entry into a state the tenant marks as Green-Light gated.
    GreenLight,
    /// Entry into the maintenance bay.
    MaintenanceBay,
}

/// Classify a requested move under the tenant's configuration.
pub fn transition_class(config: &TenantWorkflowConfig, requested: &StateName) -> TransitionClass {
    if config.requires_green_light(requested) {
        TransitionClass::GreenLight
    } else if requested == &StateName::new(states::MAINTENANCE) {
        TransitionClass::MaintenanceBay
    } else {
        TransitionClass::Standard
    }
}

/// Check whether `role` may request a move from `current` to `requested`.
///
/// Green-Light transitions are reserved for the Operations Manager. Bay
/// entry is for workshop-adjacent roles. The Maintenance role otherwise
/// only releases trucks out of the bay. Driver actors pass here on standard
/// moves; their mission-approval gate is enforced separately by the
/// controller.
pub fn authorize_transition(
    role: ActorRole,
    class: TransitionClass,
    current: &StateName,
    requested: &StateName,
) -> EngineResult<()> {
    let allowed = match class {
        TransitionClass::GreenLight => role == ActorRole::OperationsManager,
        TransitionClass::MaintenanceBay => matches!(
            role,
            ActorRole::Maintenance | ActorRole::Dispatcher | ActorRole::OperationsManager
        ),
        TransitionClass::Standard => match role {
            ActorRole::OperationsManager
            | ActorRole::Dispatcher
            | ActorRole::Driver
            | ActorRole::ContractorFocalPoint => true,
            ActorRole::Maintenance => current == &StateName::new(states::MAINTENANCE),
        },
    };

    if allowed {
        Ok(())
    } else {
        Err(EngineError::PermissionDenied(format!(
            "role {role} may not move a truck from {current} to {requested}"
        )))
    }
}

/// Check whether `role` may decide mission-driver assignments.
pub fn authorize_assignment_decision(role: ActorRole) -> EngineResult<()> {
    match role {
        ActorRole::Dispatcher | ActorRole::OperationsManager => Ok(()),
        other => Err(EngineError::PermissionDenied(format!(
            "role {other} may not decide mission-driver assignments"
        ))),
    }
}
