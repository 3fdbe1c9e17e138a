//! Process memory sampler - reads a process's %MEM from the process table

use crate::{
    core::CommandLine,
    execution::{CommandRunner, ExecutionError},
};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Position of the resident memory percentage among the numeric tokens of a `ps aux` row
///
/// `USER PID %CPU %MEM ...` yields `PID`, `%CPU`, `%MEM` as the first numeric tokens.
pub const MEM_PERCENT_COLUMN: usize = 2;

fn numeric_tokens(row: &str) -> impl Iterator<Item = &str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[0-9.]+").expect("valid numeric token pattern"))
        .find_iter(row)
        .map(|m| m.as_str())
}

/// Error types for memory sampling
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("failed to retrieve memory usage: {0}")]
    Retrieval(ExecutionError),

    #[error("failed to parse memory usage {token:?}")]
    Parse { token: String },
}

/// Conjunctive process filter: a row matches when it contains every filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryQuery {
    filters: Vec<String>,
}

impl MemoryQuery {
    pub fn new<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filters: filters.into_iter().map(Into::into).collect(),
        }
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Check if a listing row contains every filter substring
    pub fn matches(&self, row: &str) -> bool {
        self.filters.iter().all(|filter| row.contains(filter.as_str()))
    }
}

/// Extract the memory ratio of the first row matching `query`
///
/// The first line of `listing` is the header and is ignored. Returns `0.0`
/// when no row matches or the matching row has too few numeric tokens; a
/// missing process and a malformed listing are indistinguishable, and zero
/// usage reads the same as "not found".
pub fn parse_memory_ratio(listing: &str, query: &MemoryQuery) -> Result<f64, MemoryError> {
    let Some(row) = listing.lines().skip(1).find(|row| query.matches(row)) else {
        debug!("No process matches {:?}", query.filters());
        return Ok(0.0);
    };

    let Some(token) = numeric_tokens(row).nth(MEM_PERCENT_COLUMN) else {
        debug!("Matching row has no memory column: {}", row);
        return Ok(0.0);
    };

    token.parse::<f64>().map_err(|e| {
        warn!("Cannot parse memory column {:?}: {}", token, e);
        MemoryError::Parse {
            token: token.to_string(),
        }
    })
}

/// Samples process memory through the command runner
#[derive(Clone)]
pub struct MemorySampler {
    runner: Arc<dyn CommandRunner>,
    listing: CommandLine,
}

impl MemorySampler {
    /// Sampler listing processes with `ps aux`
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            listing: CommandLine::new("ps", ["aux"]),
        }
    }

    /// Memory percentage of the process matching `query`, `0.0` when not found
    pub async fn sample(&self, query: &MemoryQuery) -> Result<f64, MemoryError> {
        let result = self.runner.run(&self.listing).await;
        if let Some(error) = result.error {
            warn!("Process listing failed: {}\n{}", error, result.output);
            return Err(MemoryError::Retrieval(error));
        }
        parse_memory_ratio(&result.output, query)
    }
}
