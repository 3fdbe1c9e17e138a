//! Step domain model

use std::fmt;
use std::path::{Path, PathBuf};

/// A program invocation: program name, arguments and an optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program to execute (looked up on PATH when not absolute)
    pub program: String,

    /// Arguments passed verbatim, never through a shell
    pub args: Vec<String>,

    /// Directory the program runs in (inherits the bot's when None)
    pub working_dir: Option<PathBuf>,
}

impl CommandLine {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
        }
    }

    /// Run the command inside `dir`
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// A single step in a pipeline
///
/// Steps are identified by their position in the pipeline; `name` only
/// shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Short label for logs
    pub name: String,

    /// Status message delivered right before the command runs
    pub preamble: Option<String>,

    /// The command this step executes
    pub command: CommandLine,
}

impl Step {
    /// Create a step without a preamble
    pub fn new(name: impl Into<String>, command: CommandLine) -> Self {
        Self {
            name: name.into(),
            preamble: None,
            command,
        }
    }

    /// Attach a status message announced before the command runs
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }
}
