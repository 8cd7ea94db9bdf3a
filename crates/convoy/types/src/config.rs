//! Tenant workflow configuration
//!
//! One configuration document per tenant: the ordered set of legal truck
//! states, the transition graph between them, the subset of states whose
//! entry requires a Green Light approval, and the mapping from states to
//! named physical checkpoints. The graph may contain cycles (maintenance
//! and cargo-loss loops return trucks toward idle).

use crate::StateName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration invariant violations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("state {0} referenced by the transition map is not in the state set")]
    UnknownTransitionState(StateName),

    #[error("green-light state {0} is not in the state set")]
    UnknownGreenLightState(StateName),

    #[error("checkpoint state {0} is not in the state set")]
    UnknownCheckpointState(StateName),

    #[error("fuel-event state {0} is not in the state set")]
    UnknownFuelState(StateName),

    #[error("state set must not be empty")]
    EmptyStateSet,
}

/// Per-tenant workflow configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TenantWorkflowConfig {
    /// Ordered set of legal state names. The first two entries are the
    /// pre-dispatch states a truck may sit in while its mission-driver
    /// assignment can still be removed.
    pub states: Vec<StateName>,
    /// Legal successor states per state. A state absent from this map (or
    /// mapped to an empty list) has no configured outgoing transitions.
    pub transitions: BTreeMap<StateName, Vec<StateName>>,
    /// States whose entry is a Green-Light transition.
    #[serde(default)]
    pub green_light_states: Vec<StateName>,
    /// Named physical checkpoints, keyed by the state whose entry records
    /// an arrival at that checkpoint.
    #[serde(default)]
    pub checkpoints: BTreeMap<StateName, String>,
    /// States whose entry records a fuel event.
    #[serde(default)]
    pub fuel_states: Vec<StateName>,
}

impl TenantWorkflowConfig {
    /// Whether `state` is a member of the configured state set.
    pub fn contains_state(&self, state: &StateName) -> bool {
        self.states.contains(state)
    }

    /// Configured successors of `state`, if any.
    pub fn successors(&self, state: &StateName) -> Option<&[StateName]> {
        self.transitions.get(state).map(|next| next.as_slice())
    }

    /// Whether entering `state` requires a Green Light approval.
    pub fn requires_green_light(&self, state: &StateName) -> bool {
        self.green_light_states.contains(state)
    }

    /// The checkpoint recorded when a truck enters `state`, if any.
    pub fn checkpoint_for(&self, state: &StateName) -> Option<&str> {
        self.checkpoints.get(state).map(|name| name.as_str())
    }

    /// Whether entering `state` records a fuel event.
    pub fn emits_fuel_event(&self, state: &StateName) -> bool {
        self.fuel_states.contains(state)
    }

    /// The pre-dispatch states: the first two entries of the ordered state
    /// set. A mission-driver assignment can be removed only while every
    /// linked truck still sits in one of these.
    pub fn pre_dispatch_states(&self) -> &[StateName] {
        let bound = self.states.len().min(2);
        &self.states[..bound]
    }

    /// Validate structural invariants: every state referenced anywhere must
    /// be a member of the state set. Cycles are legal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.states.is_empty() {
            return Err(ConfigError::EmptyStateSet);
        }

        for (source, targets) in &self.transitions {
            if !self.contains_state(source) {
                return Err(ConfigError::UnknownTransitionState(source.clone()));
            }
            for target in targets {
                if !self.contains_state(target) {
                    return Err(ConfigError::UnknownTransitionState(target.clone()));
                }
            }
        }

        for state in &self.green_light_states {
            if !self.contains_state(state) {
                return Err(ConfigError::UnknownGreenLightState(state.clone()));
            }
        }

        for state in self.checkpoints.keys() {
            if !self.contains_state(state) {
                return Err(ConfigError::UnknownCheckpointState(state.clone()));
            }
        }

        for state in &self.fuel_states {
            if !self.contains_state(state) {
                return Err(ConfigError::UnknownFuelState(state.clone()));
            }
        }

        Ok(())
    }
}
