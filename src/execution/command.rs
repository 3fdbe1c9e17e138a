//! Command executor - runs one external program and captures its output

use crate::core::CommandLine;
use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Why an external program did not succeed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with status {code}")]
    ExitStatus { program: String, code: i32 },

    #[error("{program} was terminated by a signal")]
    Signaled { program: String },
}

/// Captured result of running a program
///
/// The combined stdout/stderr text is kept even when the program failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Interleaved stdout and stderr, decoded lossily as UTF-8
    pub output: String,

    /// Set when the program could not run or did not exit cleanly
    pub error: Option<ExecutionError>,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn failure(output: impl Into<String>, error: ExecutionError) -> Self {
        Self {
            output: output.into(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs external programs
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion, exactly once
    async fn run(&self, command: &CommandLine) -> CommandOutput;
}

/// Runs commands as child processes of the bot
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, command: &CommandLine) -> CommandOutput {
        debug!("Spawning {}", command);

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.working_dir {
            process.current_dir(dir);
        }

        let spawn_error = |reason: String| ExecutionError::Spawn {
            program: command.program.clone(),
            reason,
        };

        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", command.program, e);
                return CommandOutput::failure(String::new(), spawn_error(e.to_string()));
            }
        };

        let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return CommandOutput::failure(
                String::new(),
                spawn_error("output pipes were not captured".to_string()),
            );
        };

        // Drain both pipes concurrently, appending chunks in arrival order
        let mut combined = Vec::new();
        let mut out_buf = [0u8; 4096];
        let mut err_buf = [0u8; 4096];
        let (mut out_open, mut err_open) = (true, true);
        while out_open || err_open {
            tokio::select! {
                read = stdout.read(&mut out_buf), if out_open => match read {
                    Ok(0) | Err(_) => out_open = false,
                    Ok(n) => combined.extend_from_slice(&out_buf[..n]),
                },
                read = stderr.read(&mut err_buf), if err_open => match read {
                    Ok(0) | Err(_) => err_open = false,
                    Ok(n) => combined.extend_from_slice(&err_buf[..n]),
                },
            }
        }

        let output = String::from_utf8_lossy(&combined).into_owned();

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => return CommandOutput::failure(output, spawn_error(e.to_string())),
        };

        debug!(
            "{} finished with {} and {} bytes of output",
            command.program,
            status,
            output.len()
        );

        if status.success() {
            return CommandOutput::success(output);
        }

        let error = match status.code() {
            Some(code) => ExecutionError::ExitStatus {
                program: command.program.clone(),
                code,
            },
            None => ExecutionError::Signaled {
                program: command.program.clone(),
            },
        };
        warn!("{}", error);
        CommandOutput::failure(output, error)
    }
}
