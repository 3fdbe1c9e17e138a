//! Core domain models
//!
//! This module defines the data structures shared by the executor, the
//! deployment orchestrator and the chat command handlers.

pub mod config;
pub mod requester;
pub mod state;
pub mod step;

pub use config::*;
pub use requester::*;
pub use state::*;
pub use step::*;
