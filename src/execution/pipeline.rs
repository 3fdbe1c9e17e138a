//! Fail-fast pipeline - runs steps in order and stops at the first failure

use crate::{
    core::Step,
    execution::{CommandRunner, ExecutionError},
    report::{ReportDestination, ReportSink},
};
use std::sync::Arc;
use tracing::{error, info};

/// The failure that ended a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Position of the failing step
    pub index: usize,

    /// Name of the failing step
    pub step: String,

    pub error: ExecutionError,
}

/// What happened during one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Number of steps in the pipeline
    pub total_steps: usize,

    /// Number of steps that ran, the failing one included
    pub executed_steps: usize,

    /// First failure, if any; later steps never ran
    pub failure: Option<StepFailure>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Steps that were never started because an earlier one failed
    pub fn skipped_steps(&self) -> usize {
        self.total_steps - self.executed_steps
    }
}

/// Runs steps strictly in sequence against one report destination
///
/// Every executed step has its preamble and output delivered before the next
/// step starts. After a failure nothing else is executed or delivered; the
/// caller decides what to say about the failure.
#[derive(Clone)]
pub struct FailFastPipeline {
    runner: Arc<dyn CommandRunner>,
    sink: ReportSink,
}

impl FailFastPipeline {
    pub fn new(runner: Arc<dyn CommandRunner>, sink: ReportSink) -> Self {
        Self { runner, sink }
    }

    /// Run `steps` in order, reporting to `destination`
    pub async fn run(&self, destination: &ReportDestination, steps: &[Step]) -> PipelineReport {
        let mut report = PipelineReport {
            total_steps: steps.len(),
            executed_steps: 0,
            failure: None,
        };

        for (index, step) in steps.iter().enumerate() {
            report.executed_steps += 1;
            if let Err(error) = self.run_step(destination, step).await {
                error!(
                    "Step {} ({}/{}) failed: {}",
                    step.name,
                    index + 1,
                    steps.len(),
                    error
                );
                report.failure = Some(StepFailure {
                    index,
                    step: step.name.clone(),
                    error,
                });
                break;
            }
        }

        if report.succeeded() {
            info!("All {} steps completed", report.total_steps);
        } else {
            info!("Skipped {} remaining steps", report.skipped_steps());
        }

        report
    }

    /// Run a single step, delivering its preamble and output
    async fn run_step(
        &self,
        destination: &ReportDestination,
        step: &Step,
    ) -> Result<(), ExecutionError> {
        info!("Executing step: {} ({})", step.name, step.command);

        if let Some(preamble) = &step.preamble {
            self.sink.deliver(destination, preamble).await;
        }

        let result = self.runner.run(&step.command).await;
        self.sink.deliver(destination, &result.output).await;

        match result.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
