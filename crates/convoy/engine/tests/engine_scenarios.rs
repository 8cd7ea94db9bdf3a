//! End-to-end scenarios for the logistics workflow engine.
//!
//! Each test drives the public `LogisticsEngine` surface against the
//! in-memory store, walking trucks through the default tenant workflow.

use chrono::Utc;
use convoy_engine::{
    AuditQuery, EngineError, LogisticsEngine, TransitionRequest,
};
use convoy_storage::{EventFilter, TransitionCommit};
use convoy_types::{
    states, Actor, ActorRole, AssignmentStatus, AuditAction, AuditEntry, DriverId, EntityKind,
    Mission, MissionStatus, StateName, TenantId, Truck,
};
use std::sync::Arc;

fn test_engine() -> LogisticsEngine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    LogisticsEngine::new()
}

fn dispatcher() -> Actor {
    Actor::new("dispatcher-1", ActorRole::Dispatcher)
}

fn ops_manager() -> Actor {
    Actor::new("opsman-1", ActorRole::OperationsManager)
}

fn driver(id: &str) -> Actor {
    Actor::new(id, ActorRole::Driver)
}

fn request(truck: &Truck, to: &str, actor: &Actor) -> TransitionRequest {
    TransitionRequest {
        truck_id: truck.id.clone(),
        tenant_id: truck.tenant_id.clone(),
        requested: StateName::new(to),
        actor: actor.clone(),
        notes: None,
    }
}

/// Tenant with an active mission and a truck linked to it.
async fn mission_ready_truck(engine: &LogisticsEngine) -> (TenantId, Mission, Truck) {
    let tenant = engine
        .create_tenant("Relief Org", &dispatcher())
        .await
        .unwrap();
    let mission = engine
        .create_mission(&tenant.id, "Route 9 delivery", &dispatcher())
        .await
        .unwrap();
    engine
        .update_mission_status(&mission.id, &tenant.id, MissionStatus::Active, &dispatcher())
        .await
        .unwrap();
    let truck = engine
        .create_truck(&tenant.id, "KBZ-402A", 12_000, &dispatcher())
        .await
        .unwrap();
    let truck = engine
        .assign_truck(
            &truck.id,
            &tenant.id,
            &mission.id,
            Some(DriverId::new("driver-1")),
            &dispatcher(),
        )
        .await
        .unwrap();
    (tenant.id, mission, truck)
}

/// Walk a truck along a path of states with the appropriate roles.
async fn walk(engine: &LogisticsEngine, truck: &Truck, path: &[&str]) -> Truck {
    let mut current = truck.clone();
    let config = engine
        .tenant_workflow_config(&truck.tenant_id)
        .await
        .unwrap();
    for state in path {
        let actor = if config.requires_green_light(&StateName::new(state)) {
            ops_manager()
        } else {
            dispatcher()
        };
        current = engine
            .transition(request(&current, state, &actor))
            .await
            .unwrap();
    }
    current
}

#[tokio::test]
async fn dispatch_succeeds_but_skipping_states_is_denied() {
    let engine = test_engine();
    let (_, _, truck) = mission_ready_truck(&engine).await;

    let truck = engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await
        .unwrap();
    assert_eq!(truck.status, StateName::new(states::DISPATCHED));

    let result = engine
        .transition(request(&truck, states::LOADED, &dispatcher()))
        .await;
    match result {
        Err(EngineError::InvalidTransition(reason)) => {
            assert_eq!(reason, "Invalid transition from DISPATCHED to LOADED");
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
}

#[tokio::test]
async fn green_light_moves_need_the_operations_manager() {
    let engine = test_engine();
    let (_, _, truck) = mission_ready_truck(&engine).await;
    let truck = walk(
        &engine,
        &truck,
        &[states::DISPATCHED, states::FUELED, states::HP1_WAIT],
    )
    .await;

    // Graph-legal, but the dispatcher is not allowed to green-light it.
    let result = engine
        .transition(request(&truck, states::HP2_WAIT, &dispatcher()))
        .await;
    assert!(matches!(result, Err(EngineError::PermissionDenied(_))));

    let truck = engine
        .transition(request(&truck, states::HP2_WAIT, &ops_manager()))
        .await
        .unwrap();
    assert_eq!(truck.status, StateName::new(states::HP2_WAIT));
}

#[tokio::test]
async fn unapproved_drivers_never_move_mission_trucks() {
    let engine = test_engine();
    let (tenant_id, mission, truck) = mission_ready_truck(&engine).await;

    // Graph-legal move, but driver-1 is not even assigned yet.
    let result = engine
        .transition(request(&truck, states::DISPATCHED, &driver("driver-1")))
        .await;
    assert!(matches!(result, Err(EngineError::PermissionDenied(_))));

    // A pending assignment is not enough.
    engine
        .assign_drivers(
            &mission.id,
            &[DriverId::new("driver-1")],
            &tenant_id,
            &dispatcher(),
        )
        .await
        .unwrap();
    let result = engine
        .transition(request(&truck, states::DISPATCHED, &driver("driver-1")))
        .await;
    assert!(matches!(result, Err(EngineError::PermissionDenied(_))));

    engine
        .update_assignment_status(
            &mission.id,
            &DriverId::new("driver-1"),
            &tenant_id,
            AssignmentStatus::Approved,
            &ops_manager(),
        )
        .await
        .unwrap();
    let truck = engine
        .transition(request(&truck, states::DISPATCHED, &driver("driver-1")))
        .await
        .unwrap();
    assert_eq!(truck.status, StateName::new(states::DISPATCHED));
}

#[tokio::test]
async fn denied_transitions_leave_no_trace() {
    let engine = test_engine();
    let (tenant_id, _, truck) = mission_ready_truck(&engine).await;

    let audit_before = engine
        .audit_history(&tenant_id, AuditQuery::default())
        .await
        .unwrap();

    let result = engine
        .transition(request(&truck, states::LOADED, &dispatcher()))
        .await;
    assert!(matches!(result, Err(EngineError::InvalidTransition(_))));

    let stored = engine.truck(&truck.id, &tenant_id).await.unwrap();
    assert_eq!(stored.status, truck.status);
    assert_eq!(stored.version, truck.version);

    let audit_after = engine
        .audit_history(&tenant_id, AuditQuery::default())
        .await
        .unwrap();
    assert_eq!(audit_before.len(), audit_after.len());

    let checkpoints = engine
        .checkpoint_events(&tenant_id, EventFilter::default())
        .await
        .unwrap();
    assert!(checkpoints.is_empty());
}

#[tokio::test]
async fn each_transition_writes_exactly_one_audit_entry() {
    let engine = test_engine();
    let (tenant_id, _, truck) = mission_ready_truck(&engine).await;

    let before = engine
        .audit_history(
            &tenant_id,
            AuditQuery {
                entity_kind: Some(EntityKind::Truck),
                entity_id: Some(truck.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await
        .unwrap();

    let after = engine
        .audit_history(
            &tenant_id,
            AuditQuery {
                entity_kind: Some(EntityKind::Truck),
                entity_id: Some(truck.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(after.len(), before.len() + 1);

    // Single-entity history is oldest-first; the new entry is last.
    let entry = after.last().unwrap();
    assert_eq!(entry.action, AuditAction::StatusChanged);
    let before_snapshot = entry.before.as_ref().unwrap();
    let after_snapshot = entry.after.as_ref().unwrap();
    assert_eq!(before_snapshot["status"], "IDLE");
    assert_eq!(after_snapshot["status"], "DISPATCHED");
}

#[tokio::test]
async fn checkpoint_and_fuel_events_follow_the_configured_states() {
    let engine = test_engine();
    let (tenant_id, mission, truck) = mission_ready_truck(&engine).await;

    walk(
        &engine,
        &truck,
        &[states::DISPATCHED, states::FUELED, states::HP1_WAIT, states::HP2_WAIT],
    )
    .await;

    let checkpoints = engine
        .checkpoint_events(
            &tenant_id,
            EventFilter {
                mission_id: Some(mission.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let names: Vec<&str> = checkpoints
        .iter()
        .map(|event| event.checkpoint.as_str())
        .collect();
    assert_eq!(names, ["HP1", "HP2"]);

    let fuel = engine
        .fuel_events(
            &tenant_id,
            EventFilter {
                truck_id: Some(truck.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(fuel.len(), 1);
    assert_eq!(fuel[0].status, StateName::new(states::FUELED));
}

#[tokio::test]
async fn assigning_the_same_driver_twice_is_a_reported_no_op() {
    let engine = test_engine();
    let (tenant_id, mission, _) = mission_ready_truck(&engine).await;
    let driver_id = DriverId::new("driver-1");

    let first = engine
        .assign_drivers(&mission.id, &[driver_id.clone()], &tenant_id, &dispatcher())
        .await
        .unwrap();
    assert!(first[0].newly_created);

    let second = engine
        .assign_drivers(&mission.id, &[driver_id.clone()], &tenant_id, &dispatcher())
        .await
        .unwrap();
    assert!(!second[0].newly_created);
    assert_eq!(second[0].assignment.status, AssignmentStatus::Pending);

    let assignments = engine.assignments(&mission.id, &tenant_id).await.unwrap();
    assert_eq!(assignments.len(), 1);
}

#[tokio::test]
async fn drivers_cannot_join_finished_missions() {
    let engine = test_engine();
    let tenant = engine
        .create_tenant("Relief Org", &dispatcher())
        .await
        .unwrap();
    let mission = engine
        .create_mission(&tenant.id, "Route 9 delivery", &dispatcher())
        .await
        .unwrap();
    engine
        .update_mission_status(
            &mission.id,
            &tenant.id,
            MissionStatus::Cancelled,
            &dispatcher(),
        )
        .await
        .unwrap();

    let result = engine
        .assign_drivers(
            &mission.id,
            &[DriverId::new("driver-1")],
            &tenant.id,
            &dispatcher(),
        )
        .await;
    assert!(matches!(result, Err(EngineError::Conflict(_))));
}

#[tokio::test]
async fn empty_driver_list_is_a_validation_error() {
    let engine = test_engine();
    let (tenant_id, mission, _) = mission_ready_truck(&engine).await;

    let result = engine
        .assign_drivers(&mission.id, &[], &tenant_id, &dispatcher())
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[tokio::test]
async fn assignment_removal_conflicts_once_the_truck_rolls() {
    let engine = test_engine();
    let (tenant_id, mission, truck) = mission_ready_truck(&engine).await;
    let driver_id = DriverId::new("driver-1");

    engine
        .assign_drivers(&mission.id, &[driver_id.clone()], &tenant_id, &dispatcher())
        .await
        .unwrap();

    // DISPATCHED is still a pre-dispatch state, so removal works; re-assign
    // before rolling further.
    let truck = engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await
        .unwrap();
    engine
        .remove_assignment(&mission.id, &driver_id, &tenant_id, &dispatcher())
        .await
        .unwrap();
    engine
        .assign_drivers(&mission.id, &[driver_id.clone()], &tenant_id, &dispatcher())
        .await
        .unwrap();

    engine
        .transition(request(&truck, states::FUELED, &dispatcher()))
        .await
        .unwrap();
    let result = engine
        .remove_assignment(&mission.id, &driver_id, &tenant_id, &dispatcher())
        .await;
    assert!(matches!(result, Err(EngineError::Conflict(_))));
}

#[tokio::test]
async fn bulk_status_updates_report_per_item_outcomes() {
    let engine = test_engine();
    let (tenant_id, mission, _) = mission_ready_truck(&engine).await;
    let known = DriverId::new("driver-1");
    let unknown = DriverId::new("driver-ghost");

    engine
        .assign_drivers(&mission.id, &[known.clone()], &tenant_id, &dispatcher())
        .await
        .unwrap();

    let outcomes = engine
        .bulk_update_assignment_status(
            &mission.id,
            &[known.clone(), unknown.clone()],
            &tenant_id,
            AssignmentStatus::Approved,
            &ops_manager(),
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(EngineError::NotFound(_))
    ));

    // The failed item did not roll back the successful one.
    let assignment = engine
        .assignments(&mission.id, &tenant_id)
        .await
        .unwrap()
        .into_iter()
        .find(|a| a.driver_id == known)
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Approved);
    assert!(assignment.approved_by.is_some());
    assert!(assignment.approved_at.is_some());
}

#[tokio::test]
async fn stale_writers_get_a_conflict_not_a_silent_overwrite() {
    let engine = test_engine();
    let (tenant_id, _, truck) = mission_ready_truck(&engine).await;
    let storage = engine.storage();

    // Two writers read the same truck snapshot at DISPATCHED.
    let truck = engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await
        .unwrap();

    // Writer one wins through the engine.
    engine
        .transition(request(&truck, states::FUELED, &dispatcher()))
        .await
        .unwrap();

    // Writer two commits against the snapshot it read before writer one.
    let audit = AuditEntry::record(
        tenant_id.clone(),
        EntityKind::Truck,
        truck.id.to_string(),
        AuditAction::StatusChanged,
        Some(&truck),
        Some(&truck),
        dispatcher().id,
        None,
    )
    .unwrap();
    let stale = storage
        .commit_transition(TransitionCommit {
            truck_id: truck.id.clone(),
            tenant_id: tenant_id.clone(),
            expected_version: truck.version,
            new_status: StateName::new(states::MAINTENANCE),
            updated_at: Utc::now(),
            audit,
            checkpoint: None,
            fuel: None,
        })
        .await;
    assert!(matches!(
        stale,
        Err(convoy_storage::StorageError::Conflict(_))
    ));

    let stored = engine.truck(&truck.id, &tenant_id).await.unwrap();
    assert_eq!(stored.status, StateName::new(states::FUELED));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn racing_writers_produce_exactly_one_winner() {
    let engine = Arc::new(test_engine());
    let (tenant_id, _, truck) = mission_ready_truck(&engine).await;
    let truck = engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await
        .unwrap();

    // Two writers race the same move through the engine.
    let first = {
        let engine = Arc::clone(&engine);
        let req = request(&truck, states::FUELED, &dispatcher());
        tokio::spawn(async move { engine.transition(req).await })
    };
    let second = {
        let engine = Arc::clone(&engine);
        let req = request(&truck, states::FUELED, &dispatcher());
        tokio::spawn(async move { engine.transition(req).await })
    };
    let outcomes = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    // The loser either lost the version race outright or re-read the
    // already-moved truck; it never overwrites.
    let loser = outcomes.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser,
        Err(EngineError::Conflict(_) | EngineError::InvalidTransition(_))
    ));

    let stored = engine.truck(&truck.id, &tenant_id).await.unwrap();
    assert_eq!(stored.status, StateName::new(states::FUELED));
    assert_eq!(stored.version, truck.version + 1);
}

#[tokio::test]
async fn unassigned_trucks_cannot_leave_idle_for_mission_states() {
    let engine = test_engine();
    let tenant = engine
        .create_tenant("Relief Org", &dispatcher())
        .await
        .unwrap();
    let truck = engine
        .create_truck(&tenant.id, "KBZ-402A", 12_000, &dispatcher())
        .await
        .unwrap();

    let result = engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    // The maintenance bay is off-mission and stays reachable.
    let truck = engine
        .transition(request(&truck, states::MAINTENANCE, &dispatcher()))
        .await
        .unwrap();
    assert_eq!(truck.status, StateName::new(states::MAINTENANCE));
}

#[tokio::test]
async fn cross_tenant_access_reads_as_not_found() {
    let engine = test_engine();
    let (_, _, truck) = mission_ready_truck(&engine).await;
    let other = engine
        .create_tenant("Other Org", &dispatcher())
        .await
        .unwrap();

    let result = engine
        .transition(TransitionRequest {
            truck_id: truck.id.clone(),
            tenant_id: other.id.clone(),
            requested: StateName::new(states::DISPATCHED),
            actor: dispatcher(),
            notes: None,
        })
        .await;
    assert!(matches!(result, Err(EngineError::NotFound(_))));
}

#[tokio::test]
async fn tenant_wide_history_is_newest_first() {
    let engine = test_engine();
    let (tenant_id, _, truck) = mission_ready_truck(&engine).await;
    engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await
        .unwrap();

    let history = engine
        .audit_history(&tenant_id, AuditQuery::default())
        .await
        .unwrap();
    assert!(history.len() >= 2);
    assert_eq!(history[0].action, AuditAction::StatusChanged);
    for pair in history.windows(2) {
        assert!(pair[0].recorded_at >= pair[1].recorded_at);
    }
}

#[tokio::test]
async fn statistics_are_reconstructed_from_the_log() {
    let engine = test_engine();
    let (tenant_id, _, truck) = mission_ready_truck(&engine).await;
    engine
        .transition(request(&truck, states::DISPATCHED, &dispatcher()))
        .await
        .unwrap();

    let history = engine
        .audit_history(&tenant_id, AuditQuery::default())
        .await
        .unwrap();
    let stats = engine.audit_statistics(&tenant_id).await.unwrap();

    assert_eq!(stats.total_entries, history.len());
    assert_eq!(
        stats.by_action.values().sum::<usize>(),
        history.len()
    );
    assert_eq!(stats.by_action["status_changed"], 2); // mission + truck
    assert!(stats.by_actor.contains_key("dispatcher-1"));
}

#[tokio::test]
async fn full_run_returns_the_truck_to_idle() {
    let engine = test_engine();
    let (_, _, truck) = mission_ready_truck(&engine).await;

    let truck = walk(
        &engine,
        &truck,
        &[
            states::DISPATCHED,
            states::FUELED,
            states::HP1_WAIT,
            states::HP2_WAIT,
            states::LOADED,
            states::EXIT_TRANSIT,
            states::DELIVERED,
            states::RETURNING,
            states::IDLE,
        ],
    )
    .await;
    assert!(truck.is_idle());
    assert_eq!(truck.version, 1 + 1 + 9); // create, assign, nine moves
}
