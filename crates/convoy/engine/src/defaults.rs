//! Default tenant workflow configuration
//!
//! The default transition graph is a data asset, not inline literals:
//! parsed once from the embedded JSON and deep-copied into every new
//! tenant at creation time. Tenants edit their copy afterwards.

use convoy_types::TenantWorkflowConfig;
use std::sync::OnceLock;

static DEFAULT_CONFIG: OnceLock<TenantWorkflowConfig> = OnceLock::new();

/// The default workflow configuration every new tenant is seeded with.
pub fn default_workflow_config() -> &'static TenantWorkflowConfig {
    DEFAULT_CONFIG.get_or_init(|| {
        let config: TenantWorkflowConfig =
            serde_json::from_str(include_str!("default_workflow.json"))
                .expect("embedded default workflow asset is valid");
        config
            .validate()
            .expect("embedded default workflow asset satisfies config invariants");
        config
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_types::{states, StateName};

    #[test]
    fn default_asset_parses_and_validates() {
        let config = default_workflow_config();
        assert_eq!(config.states.len(), 11);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn every_state_has_configured_successors() {
        // The lenient validator fallback never fires on defaulted tenants.
        let config = default_workflow_config();
        for state in &config.states {
            let successors = config.successors(state);
            assert!(
                successors.is_some_and(|next| !next.is_empty()),
                "state {state} has no successors"
            );
        }
    }

    #[test]
    fn green_light_defaults_are_hp2_and_exit_transit() {
        let config = default_workflow_config();
        assert!(config.requires_green_light(&StateName::new(states::HP2_WAIT)));
        assert!(config.requires_green_light(&StateName::new(states::EXIT_TRANSIT)));
        assert_eq!(config.green_light_states.len(), 2);
    }

    #[test]
    fn emergency_exits_loop_back_toward_idle() {
        let config = default_workflow_config();
        let idle = StateName::new(states::IDLE);
        for state in [states::MAINTENANCE, states::CARGO_LOST] {
            let next = config.successors(&StateName::new(state)).unwrap();
            assert!(next.contains(&idle));
        }
    }

    #[test]
    fn pre_dispatch_states_are_idle_and_dispatched() {
        let config = default_workflow_config();
        assert_eq!(
            config.pre_dispatch_states(),
            &[
                StateName::new(states::IDLE),
                StateName::new(states::DISPATCHED)
            ]
        );
    }
}
