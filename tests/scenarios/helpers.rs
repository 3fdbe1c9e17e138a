//! Test utility functions for deploybot scenarios

use async_trait::async_trait;
use deploybot::core::{BotConfig, CommandLine};
use deploybot::execution::{CommandOutput, CommandRunner, ExecutionError};
use deploybot::report::{ChatTransport, DeliveryError, MessageId, ReportDestination, Responder};
use std::collections::HashMap;
use std::sync::Mutex;

pub const HOME: &str = "home";

pub const RUNNING_STATUS: &str = "● letter-counter.service - Letter Counter
     Loaded: loaded (/etc/systemd/system/letter-counter.service; enabled)
     Active: active (running) since Mon 2024-01-01 00:00:00 JST; 1s ago";

pub const FAILED_STATUS: &str = "● letter-counter.service - Letter Counter
     Loaded: loaded (/etc/systemd/system/letter-counter.service; enabled)
     Active: failed (Result: exit-code) since Mon 2024-01-01 00:00:00 JST";

/// Runner returning scripted outputs keyed by the rendered command line
///
/// Unscripted commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<CommandLine>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, command: &str, output: CommandOutput) -> Self {
        self.responses.insert(command.to_string(), output);
        self
    }

    pub fn ok(self, command: &str, output: &str) -> Self {
        self.on(command, CommandOutput::success(output))
    }

    pub fn fail(self, command: &str, output: &str) -> Self {
        let program = command.split_whitespace().next().unwrap_or_default().to_string();
        self.on(
            command,
            CommandOutput::failure(output, ExecutionError::ExitStatus { program, code: 1 }),
        )
    }

    /// Rendered command lines in the order they ran
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.to_string()).collect()
    }

    pub fn call_lines(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &CommandLine) -> CommandOutput {
        self.calls.lock().unwrap().push(command.clone());
        self.responses
            .get(&command.to_string())
            .cloned()
            .unwrap_or_else(|| CommandOutput::success(""))
    }
}

/// Transport recording every message and thread
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(ReportDestination, String)>>,
    threads: Mutex<Vec<String>>,
    refuse_threads: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport on which starting a thread always fails
    pub fn without_threads() -> Self {
        Self {
            refuse_threads: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(ReportDestination, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages delivered to `destination`, in order
    pub fn messages_to(&self, destination: &ReportDestination) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| d == destination)
            .map(|(_, content)| content.clone())
            .collect()
    }

    pub fn threads(&self) -> Vec<String> {
        self.threads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        destination: &ReportDestination,
        content: &str,
    ) -> Result<MessageId, DeliveryError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((destination.clone(), content.to_string()));
        Ok(MessageId(format!("msg-{}", sent.len())))
    }

    async fn start_thread(
        &self,
        channel: &ReportDestination,
        _anchor: &MessageId,
        name: &str,
        _auto_archive_minutes: u32,
    ) -> Result<ReportDestination, DeliveryError> {
        if self.refuse_threads {
            return Err(DeliveryError::Rejected {
                status: 403,
                body: "Missing Permissions".to_string(),
            });
        }
        let mut threads = self.threads.lock().unwrap();
        threads.push(name.to_string());
        Ok(ReportDestination::thread(format!("thread-{}", threads.len()), channel.id()))
    }
}

/// Responder recording acknowledgements
#[derive(Default)]
pub struct RecordingResponder {
    acks: Mutex<Vec<String>>,
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acks(&self) -> Vec<String> {
        self.acks.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn acknowledge(&self, content: &str) -> Result<MessageId, DeliveryError> {
        let mut acks = self.acks.lock().unwrap();
        acks.push(content.to_string());
        Ok(MessageId(format!("ack-{}", acks.len())))
    }
}

/// Config with the letter-counter application
pub fn sample_config() -> BotConfig {
    BotConfig::from_yaml(
        r#"
applications:
  - name: "letter-counter"
    path: "/srv/letter-counter"
    url: "https://letter-counter.example"
    memory_filters: ["node", "letter-counter"]
"#,
    )
    .unwrap()
}

pub fn home() -> ReportDestination {
    ReportDestination::channel(HOME)
}
