//! Deployment orchestrator - fetch, build, restart, verify, notify

use crate::{
    core::{ApplicationConfig, CommandLine, DeployState, Requester, Step},
    deploy::{DeployGuard, DeployLocks},
    execution::{CommandRunner, FailFastPipeline, StepFailure},
    probe::{ServiceManager, VerificationError},
    report::{ReportDestination, ReportSink},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

const FETCH_PREAMBLE: &str = "**Fetching the latest commits from GitHub...**";
const BUILD_PREAMBLE: &str = "**Building...**";
const RESTART_PREAMBLE: &str = "**Restarting the service...**";

/// Stage each planned step belongs to, by position
const STEP_STAGES: [DeployState; 5] = [
    DeployState::Fetching,
    DeployState::Fetching,
    DeployState::Building,
    DeployState::Building,
    DeployState::Restarting,
];

/// One accepted `update` request
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub app: ApplicationConfig,
    pub branch: String,
    pub requester: Requester,

    /// Channel the request came from
    pub home: ReportDestination,

    /// Thread receiving step output
    pub thread: ReportDestination,
}

/// Why a deployment failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeployFailure {
    #[error("step {} failed: {}", .0.step, .0.error)]
    Step(StepFailure),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Final result of a deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Succeeded {
        url: String,
    },
    Failed {
        /// Stage the run was in when it failed
        state: DeployState,
        reason: DeployFailure,
    },
}

impl DeployOutcome {
    pub fn final_state(&self) -> DeployState {
        match self {
            DeployOutcome::Succeeded { .. } => DeployState::Succeeded,
            DeployOutcome::Failed { .. } => DeployState::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeployOutcome::Succeeded { .. })
    }
}

/// Notice posted when `app` was deployed to `url`
pub fn success_notice(app: &str, url: &str) -> String {
    format!(":tada: **{} has been updated!**\nDeployed to: {}", app, url)
}

/// Notice posted when deploying `app` failed at any stage
pub fn failure_notice(app: &str) -> String {
    format!(":octagonal_sign: **An error occurred while updating {}!**", app)
}

fn command_from(parts: &[String]) -> CommandLine {
    match parts.split_first() {
        Some((program, args)) => CommandLine::new(program.clone(), args.to_vec()),
        None => CommandLine::new(String::new(), Vec::<String>::new()),
    }
}

/// Runs deployments of configured applications
pub struct DeploymentOrchestrator {
    pipeline: FailFastPipeline,
    sink: ReportSink,
    services: ServiceManager,
    locks: DeployLocks,
}

impl DeploymentOrchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, sink: ReportSink, services: ServiceManager) -> Self {
        Self {
            pipeline: FailFastPipeline::new(runner, sink.clone()),
            sink,
            services,
            locks: DeployLocks::new(),
        }
    }

    /// Claim `app` for a deployment
    pub fn try_lock(&self, app: &str) -> Option<DeployGuard> {
        self.locks.try_acquire(app)
    }

    /// Steps deploying `request.branch` of the application
    pub fn plan(&self, request: &DeployRequest) -> Vec<Step> {
        let app = &request.app;
        let dir = &app.path;
        let target = format!("origin/{}", request.branch);

        vec![
            Step::new("fetch", CommandLine::new("git", ["fetch"]).in_dir(dir))
                .with_preamble(FETCH_PREAMBLE),
            Step::new(
                "reset",
                CommandLine::new("git", ["reset", "--hard", target.as_str()]).in_dir(dir),
            ),
            Step::new("install", command_from(&app.install).in_dir(dir))
                .with_preamble(BUILD_PREAMBLE),
            Step::new("build", command_from(&app.build).in_dir(dir)),
            Step::new("restart", self.services.restart_command(&app.service_name()))
                .with_preamble(RESTART_PREAMBLE),
        ]
    }

    /// Run a deployment to completion and send the final notices
    pub async fn deploy(&self, request: &DeployRequest) -> DeployOutcome {
        let run_id = Uuid::new_v4();
        let app = &request.app;
        info!(
            "Deployment {} of {} ({}) requested by {}",
            run_id,
            app.name,
            request.branch,
            request.requester.display_name()
        );

        let steps = self.plan(request);
        let report = self.pipeline.run(&request.thread, &steps).await;

        let outcome = match report.failure {
            Some(failure) => DeployOutcome::Failed {
                state: STEP_STAGES
                    .get(failure.index)
                    .copied()
                    .unwrap_or(DeployState::Pending),
                reason: DeployFailure::Step(failure),
            },
            None => match self.services.verify_running(&app.service_name()).await {
                Ok(()) => DeployOutcome::Succeeded {
                    url: app.url.clone(),
                },
                Err(e) => DeployOutcome::Failed {
                    state: DeployState::Verifying,
                    reason: e.into(),
                },
            },
        };

        match &outcome {
            DeployOutcome::Succeeded { .. } => info!("Deployment {} of {} succeeded", run_id, app.name),
            DeployOutcome::Failed { state, reason } => error!(
                "Deployment {} of {} failed while {}: {}",
                run_id, app.name, state, reason
            ),
        }

        self.notify(request, &outcome).await;
        outcome
    }

    /// Send the outcome to the thread and, with a mention, to the home channel
    async fn notify(&self, request: &DeployRequest, outcome: &DeployOutcome) {
        let notice = match outcome {
            DeployOutcome::Succeeded { url } => success_notice(&request.app.name, url),
            DeployOutcome::Failed { .. } => failure_notice(&request.app.name),
        };

        let mentioned = format!("{} {}", request.requester.mention(), notice);
        self.sink.deliver(&request.home, &mentioned).await;
        if request.thread != request.home {
            self.sink.deliver(&request.thread, &notice).await;
        }
    }

    /// Run the deployment as a detached task
    ///
    /// The task is never cancelled and has no overall timeout; dropping the
    /// handle leaves it running. `guard` is released when the run ends.
    pub fn spawn(
        self: &Arc<Self>,
        request: DeployRequest,
        guard: DeployGuard,
    ) -> JoinHandle<DeployOutcome> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = orchestrator.deploy(&request).await;
            debug!("Releasing deployment lock of {}", guard.app());
            drop(guard);
            outcome
        })
    }
}
