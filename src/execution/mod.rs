//! Command execution and the fail-fast pipeline

pub mod command;
pub mod pipeline;

pub use command::{CommandOutput, CommandRunner, ExecutionError, SystemCommandRunner};
pub use pipeline::{FailFastPipeline, PipelineReport, StepFailure};
