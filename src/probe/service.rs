//! Service manager boundary - restart a unit and check it is running

use crate::{
    core::{CommandLine, ServiceManagerConfig},
    execution::CommandRunner,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// The post-deployment health check did not pass
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("{service} is not running")]
    NotRunning { service: String },
}

/// Builds restart commands and verifies unit status
#[derive(Clone)]
pub struct ServiceManager {
    runner: Arc<dyn CommandRunner>,
    config: ServiceManagerConfig,
}

impl ServiceManager {
    pub fn new(runner: Arc<dyn CommandRunner>, config: ServiceManagerConfig) -> Self {
        Self { runner, config }
    }

    /// Privileged restart of `service`
    pub fn restart_command(&self, service: &str) -> CommandLine {
        match &self.config.escalate {
            Some(escalate) => CommandLine::new(
                escalate.clone(),
                [self.config.systemctl.as_str(), "restart", service],
            ),
            None => CommandLine::new(self.config.systemctl.clone(), ["restart", service]),
        }
    }

    /// Unprivileged status query for `service`
    pub fn status_command(&self, service: &str) -> CommandLine {
        CommandLine::new(self.config.systemctl.clone(), ["status", service])
    }

    /// Check the status output of `service` for the active marker
    ///
    /// The exit status of the query is ignored: only the marker decides.
    pub async fn verify_running(&self, service: &str) -> Result<(), VerificationError> {
        let result = self.runner.run(&self.status_command(service)).await;
        if result.output.contains(&self.config.active_marker) {
            info!("{} is running", service);
            Ok(())
        } else {
            warn!("{} did not report {:?}", service, self.config.active_marker);
            Err(VerificationError::NotRunning {
                service: service.to_string(),
            })
        }
    }
}
