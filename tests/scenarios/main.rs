//! Scenario-based tests for deploybot

mod helpers;

mod chunking;
mod commands;
mod fail_fast;
