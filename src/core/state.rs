//! Deployment state models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a deployment run currently is
///
/// Runs move `Pending → Fetching → Building → Restarting → Verifying` and end
/// in either `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployState {
    /// Accepted, nothing executed yet
    Pending,
    /// Fetching and resetting to the requested branch
    Fetching,
    /// Installing dependencies and building
    Building,
    /// Restarting the managed service
    Restarting,
    /// Checking the service reports itself as running
    Verifying,
    /// Every step and the verification passed
    Succeeded,
    /// Some step or the verification failed
    Failed,
}

impl DeployState {
    /// Check if the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployState::Succeeded | DeployState::Failed)
    }
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeployState::Pending => "pending",
            DeployState::Fetching => "fetching",
            DeployState::Building => "building",
            DeployState::Restarting => "restarting",
            DeployState::Verifying => "verifying",
            DeployState::Succeeded => "succeeded",
            DeployState::Failed => "failed",
        };
        f.write_str(label)
    }
}
