//! Chat command handlers: `update`, `memory` and `version`

pub mod interaction;

use crate::{
    core::BotConfig,
    deploy::{DeployOutcome, DeployRequest, DeploymentOrchestrator},
    execution::CommandRunner,
    probe::{MemoryQuery, MemorySampler, ServiceManager, VersionProbe},
    report::{split_frames, ChatTransport, MessageId, ReportDestination, ReportSink, Responder},
};
use chrono::{FixedOffset, Offset, Utc};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub use interaction::{CommandError, Interaction};

/// Timestamp format used in acknowledgements and thread names
const ACCEPTED_AT_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Check that `branch` is safe to hand to git as a ref name
pub fn validate_branch(branch: &str) -> Result<(), CommandError> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._/-]+$").expect("valid branch pattern"));

    if !pattern.is_match(branch) || branch.starts_with('-') || branch.contains("..") {
        return Err(CommandError::InvalidBranch(branch.to_string()));
    }
    Ok(())
}

/// Dispatches chat commands to the deployment and status components
pub struct Bot {
    config: BotConfig,
    runner: Arc<dyn CommandRunner>,
    sink: ReportSink,
    orchestrator: Arc<DeploymentOrchestrator>,
    sampler: MemorySampler,
}

impl Bot {
    pub fn new(
        config: BotConfig,
        runner: Arc<dyn CommandRunner>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let sink = ReportSink::new(transport, config.frame_budget);
        let services = ServiceManager::new(runner.clone(), config.service_manager.clone());
        let orchestrator = Arc::new(DeploymentOrchestrator::new(
            runner.clone(),
            sink.clone(),
            services,
        ));
        let sampler = MemorySampler::new(runner.clone());

        Self {
            config,
            runner,
            sink,
            orchestrator,
            sampler,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Handle one interaction
    ///
    /// Errors are replied to the requester before being returned. For
    /// `update` the handle of the detached deployment task is returned.
    pub async fn handle(
        &self,
        interaction: &Interaction,
        responder: &dyn Responder,
    ) -> Result<Option<JoinHandle<DeployOutcome>>, CommandError> {
        info!(
            "Command {} from {}",
            interaction.command,
            interaction.requester.display_name()
        );

        let result = match interaction.command.as_str() {
            "update" => self.update(interaction, responder).await.map(Some),
            "memory" => self.memory(interaction, responder).await.map(|_| None),
            "version" => self.version(interaction, responder).await.map(|_| None),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        };

        if let Err(e) = &result {
            warn!("Command {} rejected: {}", interaction.command, e);
            self.respond(responder, &interaction.channel, &e.to_string())
                .await;
        }
        result
    }

    /// Acknowledge, start a thread and dispatch the deployment
    async fn update(
        &self,
        interaction: &Interaction,
        responder: &dyn Responder,
    ) -> Result<JoinHandle<DeployOutcome>, CommandError> {
        let name = interaction.required("name")?;
        let app = self
            .config
            .application(name)
            .ok_or_else(|| CommandError::UnknownApplication(name.to_string()))?;

        let branch = interaction
            .option("branch")
            .unwrap_or(app.default_branch.as_str())
            .to_string();
        validate_branch(&branch)?;

        let guard = self
            .orchestrator
            .try_lock(&app.name)
            .ok_or_else(|| CommandError::AlreadyDeploying(app.name.clone()))?;

        let accepted_at = self.accepted_at();
        let text = format!(
            "Updating {}\nRequested by: {}\nAccepted at: {}",
            app.name,
            interaction.requester.display_name(),
            accepted_at
        );
        let anchor = self.respond(responder, &interaction.channel, &text).await;

        let thread_name = format!("{}({})", app.name, accepted_at);
        let thread = match anchor {
            Some(anchor) => self.start_thread(interaction, &anchor, &thread_name).await,
            None => interaction.channel.clone(),
        };

        let request = DeployRequest {
            app: app.clone(),
            branch,
            requester: interaction.requester.clone(),
            home: interaction.channel.clone(),
            thread,
        };
        Ok(self.orchestrator.spawn(request, guard))
    }

    /// Thread for deployment output, or the home channel when it cannot be started
    async fn start_thread(
        &self,
        interaction: &Interaction,
        anchor: &MessageId,
        name: &str,
    ) -> ReportDestination {
        match self
            .sink
            .transport()
            .start_thread(
                &interaction.channel,
                anchor,
                name,
                self.config.thread_archive_minutes,
            )
            .await
        {
            Ok(thread) => thread,
            Err(e) => {
                warn!("Cannot start thread {}: {}", name, e);
                interaction.channel.clone()
            }
        }
    }

    /// Reply with the memory share of an application's process
    async fn memory(
        &self,
        interaction: &Interaction,
        responder: &dyn Responder,
    ) -> Result<(), CommandError> {
        let name = interaction.required("name")?;
        let app = self
            .config
            .application(name)
            .ok_or_else(|| CommandError::UnknownApplication(name.to_string()))?;

        let query = MemoryQuery::new(app.process_filters());
        let text = match self.sampler.sample(&query).await {
            Ok(ratio) if ratio == 0.0 => "Could not find the process".to_string(),
            Ok(ratio) => format!("Memory usage of {}: {:.1}%", app.name, ratio),
            Err(e) => format!("An error occurred: {}", e),
        };

        self.respond(responder, &interaction.channel, &text).await;
        Ok(())
    }

    /// Reply with the version of some installed software
    async fn version(
        &self,
        interaction: &Interaction,
        responder: &dyn Responder,
    ) -> Result<(), CommandError> {
        let name = interaction.required("name")?;
        let probe = self
            .config
            .version_probe(name)
            .map(VersionProbe::from_config)
            .ok_or_else(|| CommandError::UnknownSoftware(name.to_string()))?;

        if probe.deferred {
            self.respond(responder, &interaction.channel, "Running command...")
                .await;
            let report = probe.query(self.runner.as_ref()).await;
            self.sink.deliver(&interaction.channel, &report.text).await;
            if let Some(error) = report.error {
                self.sink
                    .deliver(&interaction.channel, &error.to_string())
                    .await;
            }
            return Ok(());
        }

        let report = probe.query(self.runner.as_ref()).await;
        self.respond(responder, &interaction.channel, &report.text)
            .await;
        if let Some(error) = report.error {
            self.sink
                .deliver(&interaction.channel, &error.to_string())
                .await;
        }
        Ok(())
    }

    /// Acknowledge with the first frame of `text`; the rest goes to `channel`
    async fn respond(
        &self,
        responder: &dyn Responder,
        channel: &ReportDestination,
        text: &str,
    ) -> Option<MessageId> {
        let frames = split_frames(text, self.sink.frame_budget());
        let (first, rest) = match frames.split_first() {
            Some((first, rest)) => (*first, rest.concat()),
            None => ("(no output)", String::new()),
        };

        let anchor = match responder.acknowledge(first).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Cannot respond to command: {}", e);
                None
            }
        };
        self.sink.deliver(channel, &rest).await;
        anchor
    }

    /// Current time in the configured offset
    fn accepted_at(&self) -> String {
        let offset = FixedOffset::east_opt(self.config.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        Utc::now()
            .with_timezone(&offset)
            .format(ACCEPTED_AT_FORMAT)
            .to_string()
    }
}
