//! The `version` command and command-level errors

use crate::helpers::*;
use deploybot::core::Requester;
use deploybot::{Bot, CommandError, Interaction};
use std::sync::Arc;

fn bot(runner: ScriptedRunner) -> (Bot, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let bot = Bot::new(sample_config(), Arc::new(runner), transport.clone());
    (bot, transport)
}

fn version(name: &str) -> Interaction {
    Interaction::new("version", Requester::new("42", "alice"), home()).with_option("name", name)
}

#[tokio::test]
async fn test_version_reply_carries_prefix() {
    let (bot, transport) = bot(ScriptedRunner::new().ok("node -v", "v20.11.0\n"));
    let responder = RecordingResponder::new();

    bot.handle(&version("node"), &responder).await.unwrap();

    assert_eq!(responder.acks(), vec!["node v20.11.0\n"]);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_pip_acknowledges_before_running() {
    let (bot, transport) = bot(ScriptedRunner::new().ok(
        "python3 -m pip --version",
        "pip 24.0 from /usr/lib/python3/dist-packages/pip (python 3.12)\n",
    ));
    let responder = RecordingResponder::new();

    bot.handle(&version("pip"), &responder).await.unwrap();

    assert_eq!(responder.acks(), vec!["Running command..."]);
    let follow_up = transport.messages_to(&home());
    assert_eq!(follow_up.len(), 1);
    assert!(follow_up[0].starts_with("pip 24.0"));
}

#[tokio::test]
async fn test_failing_probe_reports_output_and_error() {
    let (bot, transport) = bot(ScriptedRunner::new().fail("go version", "go: not found"));
    let responder = RecordingResponder::new();

    bot.handle(&version("go"), &responder).await.unwrap();

    assert_eq!(responder.acks(), vec!["go: not found"]);
    assert_eq!(
        transport.messages_to(&home()),
        vec!["go exited with status 1"]
    );
}

#[tokio::test]
async fn test_blank_version_output_still_acknowledges() {
    let (bot, _) = bot(ScriptedRunner::new().ok("php -v", ""));
    let responder = RecordingResponder::new();

    bot.handle(&version("php"), &responder).await.unwrap();

    assert_eq!(responder.acks(), vec!["(no output)"]);
}

#[tokio::test]
async fn test_unknown_software_is_rejected() {
    let (bot, _) = bot(ScriptedRunner::new());
    let responder = RecordingResponder::new();

    let result = bot.handle(&version("cobol"), &responder).await;

    assert_eq!(
        result.err(),
        Some(CommandError::UnknownSoftware("cobol".to_string()))
    );
    assert_eq!(responder.acks(), vec!["Unknown software: cobol"]);
}

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let (bot, _) = bot(ScriptedRunner::new());
    let responder = RecordingResponder::new();
    let interaction = Interaction::new("rollback", Requester::new("42", "alice"), home());

    let result = bot.handle(&interaction, &responder).await;

    assert_eq!(
        result.err(),
        Some(CommandError::UnknownCommand("rollback".to_string()))
    );
    assert_eq!(responder.acks(), vec!["Unknown command: rollback"]);
}

#[tokio::test]
async fn test_missing_name_option_is_rejected() {
    let (bot, transport) = bot(ScriptedRunner::new());
    let responder = RecordingResponder::new();
    let interaction = Interaction::new("memory", Requester::new("42", "alice"), home());

    let result = bot.handle(&interaction, &responder).await;

    assert_eq!(result.err(), Some(CommandError::MissingOption("name")));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_long_reply_overflows_into_channel() {
    let listing = "x".repeat(2500);
    let (bot, transport) = bot(ScriptedRunner::new().ok("git --version", &listing));
    let responder = RecordingResponder::new();

    bot.handle(&version("git"), &responder).await.unwrap();

    let acks = responder.acks();
    assert_eq!(acks.len(), 1);
    assert_eq!(acks[0].chars().count(), 2000);
    assert_eq!(transport.messages_to(&home()), vec!["x".repeat(500)]);
}
