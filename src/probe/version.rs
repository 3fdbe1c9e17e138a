//! Software version probes

use crate::{
    core::{CommandLine, VersionProbeConfig},
    execution::{CommandRunner, ExecutionError},
};
use tracing::info;

/// A command that prints the version of some installed software
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionProbe {
    pub name: String,
    pub command: CommandLine,
    pub prefix: String,
    pub deferred: bool,
}

/// Text produced by a version probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    /// Prefix followed by the program output
    pub text: String,

    pub error: Option<ExecutionError>,
}

impl VersionProbe {
    pub fn from_config(config: &VersionProbeConfig) -> Self {
        Self {
            name: config.name.clone(),
            command: CommandLine::new(config.program.clone(), config.args.clone()),
            prefix: config.prefix.clone(),
            deferred: config.deferred,
        }
    }

    /// Run the probe once
    pub async fn query(&self, runner: &dyn CommandRunner) -> VersionReport {
        info!("Querying version of {}", self.name);
        let result = runner.run(&self.command).await;
        VersionReport {
            text: format!("{}{}", self.prefix, result.output),
            error: result.error,
        }
    }
}
