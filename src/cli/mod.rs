//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{MemoryCommand, UpdateCommand, ValidateCommand, VersionCommand};
use std::ffi::OsString;

/// Deploy services and report server status
#[derive(Debug, Parser, Clone)]
#[command(name = "deploybot")]
#[command(author = "deploybot contributors")]
#[command(version = "0.1.0")]
#[command(about = "Deploy services and report server status to a chat channel", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to bot configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Chat channel to report to (prints to the terminal when absent)
    #[arg(long, global = true)]
    pub channel: Option<String>,

    /// Bot token for the chat platform
    #[arg(long, global = true, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Name of the person requesting the command
    #[arg(long, global = true, env = "USER")]
    pub requester: Option<String>,

    /// Chat user id of the requester, used for mentions
    #[arg(long, global = true)]
    pub user_id: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Fetch, build and restart an application
    Update(UpdateCommand),

    /// Show the memory share of an application's process
    Memory(MemoryCommand),

    /// Show the version of installed software
    Version(VersionCommand),

    /// Validate a bot configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
