//! deploybot - deploy services and report server status through chat commands

pub mod bot;
pub mod cli;
pub mod core;
pub mod deploy;
pub mod execution;
pub mod probe;
pub mod report;

// Re-export commonly used types
pub use bot::{Bot, CommandError, Interaction};
pub use core::{BotConfig, CommandLine, DeployState, Requester, Step};
pub use deploy::{DeployOutcome, DeployRequest, DeploymentOrchestrator};
pub use execution::{CommandOutput, CommandRunner, ExecutionError, FailFastPipeline, SystemCommandRunner};
pub use report::{ChatTransport, ReportDestination, ReportSink, Responder};
