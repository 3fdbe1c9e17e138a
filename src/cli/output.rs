//! CLI output formatting

use crate::core::{BotConfig, DeployState};
use crate::deploy::DeployOutcome;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a deployment state for display
///
/// Final states are shown in bold.
pub fn format_deploy_state(state: DeployState) -> String {
    let label = style(state.to_string().to_uppercase());
    let label = match state {
        DeployState::Pending => label.dim(),
        DeployState::Succeeded => label.green(),
        DeployState::Failed => label.red(),
        _ => label.yellow(),
    };
    if state.is_terminal() {
        label.bold().to_string()
    } else {
        label.to_string()
    }
}

/// Format the final result of a deployment
pub fn format_outcome(app: &str, outcome: &DeployOutcome) -> String {
    match outcome {
        DeployOutcome::Succeeded { url } => format!(
            "{} {} {} → {}",
            CHECK,
            style(app).bold(),
            format_deploy_state(outcome.final_state()),
            style(url).cyan()
        ),
        DeployOutcome::Failed { state, reason } => format!(
            "{} {} {} while {}: {}",
            CROSS,
            style(app).bold(),
            format_deploy_state(outcome.final_state()),
            format_deploy_state(*state),
            style(reason).dim()
        ),
    }
}

/// Format a summary of a loaded configuration
pub fn format_config_summary(config: &BotConfig) -> String {
    let mut lines = vec![
        format!("  Applications: {}", style(config.applications.len()).cyan()),
        format!("  Version probes: {}", style(config.versions.len()).cyan()),
        format!("  Frame budget: {}", style(config.frame_budget).cyan()),
    ];
    for app in &config.applications {
        lines.push(format!(
            "  {} {} ({}, {})",
            ROCKET,
            style(&app.name).bold(),
            style(app.path.display()).dim(),
            style(app.service_name()).dim()
        ));
    }
    lines.join("\n")
}
