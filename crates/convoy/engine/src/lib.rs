//! Convoy Logistics Workflow Engine
//!
//! Tracks humanitarian-aid trucks through a multi-stage border-crossing and
//! delivery pipeline across independent tenants. The engine:
//!
//! 1. Validates requested truck state transitions against the tenant's
//!    configured transition graph ([`validator`])
//! 2. Gates Green-Light transitions behind elevated roles ([`gate`])
//! 3. Applies transitions atomically with their audit entry and any
//!    checkpoint/fuel event ([`controller`])
//! 4. Runs the mission-driver approval sub-workflow ([`approvals`])
//! 5. Serves the immutable audit history and compliance statistics
//!    ([`audit_log`])
//!
//! The engine never owns a wire protocol; it is consumed in-process through
//! [`LogisticsEngine`], with persistence behind the `convoy-storage` traits.

#![deny(unsafe_code)]

pub mod approvals;
pub mod audit_log;
pub mod controller;
mod defaults;
mod engine;
mod errors;
pub mod gate;
pub mod validator;

pub use approvals::{AssignmentOutcome, BatchOutcome, MissionApprovalService};
pub use audit_log::{AuditLog, AuditQuery, AuditStatistics};
pub use controller::{TransitionRequest, TruckStateController};
pub use defaults::default_workflow_config;
pub use engine::LogisticsEngine;
pub use errors::{EngineError, EngineResult};
pub use gate::TransitionClass;
pub use validator::TransitionCheck;
