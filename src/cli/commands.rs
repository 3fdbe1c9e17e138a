//! CLI command definitions

use crate::bot::Interaction;
use crate::core::Requester;
use crate::report::ReportDestination;
use clap::Args;

/// Fetch, build and restart an application
#[derive(Debug, Args, Clone)]
pub struct UpdateCommand {
    /// Application name
    #[arg(short, long)]
    pub name: String,

    /// Branch to deploy (defaults to the application's default branch)
    #[arg(short, long)]
    pub branch: Option<String>,
}

/// Show the memory share of an application's process
#[derive(Debug, Args, Clone)]
pub struct MemoryCommand {
    /// Application name
    #[arg(short, long)]
    pub name: String,
}

/// Show the version of installed software
#[derive(Debug, Args, Clone)]
pub struct VersionCommand {
    /// Software name
    #[arg(short, long)]
    pub name: String,
}

/// Validate a bot configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl UpdateCommand {
    pub fn to_interaction(&self, requester: Requester, channel: ReportDestination) -> Interaction {
        let interaction = Interaction::new("update", requester, channel).with_option("name", &self.name);
        match &self.branch {
            Some(branch) => interaction.with_option("branch", branch),
            None => interaction,
        }
    }
}

impl MemoryCommand {
    pub fn to_interaction(&self, requester: Requester, channel: ReportDestination) -> Interaction {
        Interaction::new("memory", requester, channel).with_option("name", &self.name)
    }
}

impl VersionCommand {
    pub fn to_interaction(&self, requester: Requester, channel: ReportDestination) -> Interaction {
        Interaction::new("version", requester, channel).with_option("name", &self.name)
    }
}
