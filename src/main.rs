use anyhow::{Context, Result};
use deploybot::cli::commands::ValidateCommand;
use deploybot::cli::output::*;
use deploybot::cli::{Cli, Command};
use deploybot::core::{BotConfig, Requester};
use deploybot::report::{
    ChannelResponder, ChatTransport, ConsoleTransport, DiscordTransport, ReportDestination, Responder,
};
use deploybot::{Bot, SystemCommandRunner};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Channel name used when printing to the terminal
const CONSOLE_CHANNEL: &str = "console";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    run_command(&cli).await
}

fn load_config(cli: &Cli) -> Result<BotConfig> {
    if let Some(path) = &cli.config {
        return BotConfig::from_file(path)
            .with_context(|| format!("Failed to load bot config from {}", path));
    }

    match BotConfig::default_path() {
        Some(path) if path.exists() => BotConfig::from_file(&path)
            .with_context(|| format!("Failed to load bot config from {}", path.display())),
        _ => {
            info!("No config file found, using defaults");
            Ok(BotConfig::default())
        }
    }
}

async fn run_command(cli: &Cli) -> Result<()> {
    let channel = ReportDestination::channel(
        cli.channel.clone().unwrap_or_else(|| CONSOLE_CHANNEL.to_string()),
    );
    let requester = Requester {
        user_id: cli.user_id.clone(),
        nickname: None,
        username: cli.requester.clone(),
    };

    let interaction = match &cli.command {
        Command::Update(cmd) => cmd.to_interaction(requester, channel.clone()),
        Command::Memory(cmd) => cmd.to_interaction(requester, channel.clone()),
        Command::Version(cmd) => cmd.to_interaction(requester, channel.clone()),
        Command::Validate(cmd) => return validate_config(cli, cmd),
    };

    let config = load_config(cli)?;

    // Post to the chat platform only when both a channel and a token are given
    let (transport, responder): (Arc<dyn ChatTransport>, Arc<dyn Responder>) =
        match (&cli.channel, &cli.token) {
            (Some(_), Some(token)) => {
                let discord: Arc<dyn ChatTransport> = Arc::new(DiscordTransport::new(token.clone()));
                let responder: Arc<dyn Responder> =
                    Arc::new(ChannelResponder::new(discord.clone(), channel));
                (discord, responder)
            }
            _ => {
                let console = Arc::new(ConsoleTransport::new());
                let transport: Arc<dyn ChatTransport> = console.clone();
                let responder: Arc<dyn Responder> = console;
                (transport, responder)
            }
        };

    let bot = Bot::new(config, Arc::new(SystemCommandRunner::new()), transport);

    match bot.handle(&interaction, responder.as_ref()).await {
        Ok(Some(deployment)) => {
            // The deployment runs detached; wait so the process outlives it
            let outcome = deployment.await.context("Deployment task panicked")?;
            let app = interaction.option("name").unwrap_or_default();
            println!("\n{}", format_outcome(app, &outcome));
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Ok(None) => {}
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn validate_config(cli: &Cli, cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating bot configuration...", INFO);

    match load_config(cli) {
        Ok(config) => {
            println!("{} Bot configuration is valid!", CHECK);
            println!("{}", format_config_summary(&config));

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(format!("{:#}", e)).red());
            std::process::exit(1);
        }
    }
}
