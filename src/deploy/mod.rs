//! Application deployment

pub mod lock;
pub mod orchestrator;

pub use lock::{DeployGuard, DeployLocks};
pub use orchestrator::{
    failure_notice, success_notice, DeployFailure, DeployOutcome, DeployRequest,
    DeploymentOrchestrator,
};
