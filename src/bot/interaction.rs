//! Parsed command invocations

use crate::{core::Requester, report::ReportDestination};
use thiserror::Error;

/// A command invocation as delivered by the chat platform
#[derive(Debug, Clone)]
pub struct Interaction {
    /// Command name (`update`, `memory`, `version`)
    pub command: String,

    /// Named string options in the order the platform sent them
    pub options: Vec<(String, String)>,

    pub requester: Requester,

    /// Channel the command was invoked in
    pub channel: ReportDestination,
}

impl Interaction {
    pub fn new(command: impl Into<String>, requester: Requester, channel: ReportDestination) -> Self {
        Self {
            command: command.into(),
            options: Vec::new(),
            requester,
            channel,
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }

    /// Value of the named option
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a required option
    pub fn required(&self, name: &'static str) -> Result<&str, CommandError> {
        self.option(name).ok_or(CommandError::MissingOption(name))
    }
}

/// Error types for command handling; every one ends up as a chat reply
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    #[error("Unknown application: {0}")]
    UnknownApplication(String),

    #[error("Unknown software: {0}")]
    UnknownSoftware(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranch(String),

    #[error("{0} is already being updated")]
    AlreadyDeploying(String),
}
