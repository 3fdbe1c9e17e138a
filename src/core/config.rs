//! Bot configuration from YAML

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default size of a single chat message, in characters
pub const DEFAULT_FRAME_BUDGET: usize = 2000;

/// Marker `systemctl status` prints for a healthy unit
pub const DEFAULT_ACTIVE_MARKER: &str = "Active: active (running)";

/// Top-level bot configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Maximum characters per delivered message
    pub frame_budget: usize,

    /// Offset from UTC used for acceptance timestamps
    pub utc_offset_hours: i32,

    /// Minutes of inactivity before a deployment thread is archived
    pub thread_archive_minutes: u32,

    /// How services are restarted and checked
    pub service_manager: ServiceManagerConfig,

    /// Applications that can be deployed and sampled
    pub applications: Vec<ApplicationConfig>,

    /// Software whose version can be queried
    pub versions: Vec<VersionProbeConfig>,
}

/// Service manager invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceManagerConfig {
    /// Privilege escalation program prefixed to the restart command
    pub escalate: Option<String>,

    /// Path to systemctl
    pub systemctl: String,

    /// Substring the status output must contain for a running service
    pub active_marker: String,
}

/// A deployable application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Name used in chat commands
    pub name: String,

    /// Git checkout the deployment works in
    pub path: PathBuf,

    /// Managed service unit (defaults to `<name>.service`)
    #[serde(default)]
    pub service: Option<String>,

    /// Where the deployed application can be reached
    pub url: String,

    /// Branch used when the request does not name one
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Substrings identifying the application's process (defaults to `[<name>]`)
    #[serde(default)]
    pub memory_filters: Vec<String>,

    /// Dependency install command
    #[serde(default = "default_install")]
    pub install: Vec<String>,

    /// Build command
    #[serde(default = "default_build")]
    pub build: Vec<String>,
}

/// A software version query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionProbeConfig {
    /// Name used in chat commands
    pub name: String,

    /// Program to execute
    pub program: String,

    /// Arguments that make the program print its version
    #[serde(default)]
    pub args: Vec<String>,

    /// Text prepended to the program output
    #[serde(default)]
    pub prefix: String,

    /// Acknowledge first and deliver the output to the channel afterwards
    #[serde(default)]
    pub deferred: bool,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_install() -> Vec<String> {
    vec!["npm".to_string(), "install".to_string()]
}

fn default_build() -> Vec<String> {
    vec!["npm".to_string(), "run".to_string(), "build".to_string()]
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            frame_budget: DEFAULT_FRAME_BUDGET,
            utc_offset_hours: 9,
            thread_archive_minutes: 60,
            service_manager: ServiceManagerConfig::default(),
            applications: Vec::new(),
            versions: default_versions(),
        }
    }
}

impl Default for ServiceManagerConfig {
    fn default() -> Self {
        Self {
            escalate: Some("doas".to_string()),
            systemctl: "/usr/bin/systemctl".to_string(),
            active_marker: DEFAULT_ACTIVE_MARKER.to_string(),
        }
    }
}

fn probe(name: &str, program: &str, args: &[&str], prefix: &str, deferred: bool) -> VersionProbeConfig {
    VersionProbeConfig {
        name: name.to_string(),
        program: program.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        prefix: prefix.to_string(),
        deferred,
    }
}

/// Version probes available when the config file lists none
pub fn default_versions() -> Vec<VersionProbeConfig> {
    vec![
        probe("git", "git", &["--version"], "", false),
        probe("go", "go", &["version"], "", false),
        probe("node", "node", &["-v"], "node ", false),
        probe("npm", "npm", &["-v"], "npm ", false),
        probe("php", "php", &["-v"], "", false),
        probe("pip", "python3", &["-m", "pip", "--version"], "", true),
        probe("python", "python3", &["--version"], "", false),
    ]
}

impl ApplicationConfig {
    /// Service unit restarted after a build
    pub fn service_name(&self) -> String {
        self.service
            .clone()
            .unwrap_or_else(|| format!("{}.service", self.name))
    }

    /// Filters identifying the application's process in a process listing
    pub fn process_filters(&self) -> Vec<String> {
        if self.memory_filters.is_empty() {
            vec![self.name.clone()]
        } else {
            self.memory_filters.clone()
        }
    }
}

impl BotConfig {
    /// Load bot configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse bot configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BotConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config location: `<config dir>/deploybot/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deploybot").join("config.yaml"))
    }

    /// Validate the bot configuration
    pub fn validate(&self) -> Result<()> {
        if self.frame_budget == 0 {
            anyhow::bail!("frame_budget must be greater than zero");
        }

        if !(-23..=23).contains(&self.utc_offset_hours) {
            anyhow::bail!(
                "utc_offset_hours must be between -23 and 23, got {}",
                self.utc_offset_hours
            );
        }

        if self.service_manager.systemctl.trim().is_empty() {
            anyhow::bail!("service_manager.systemctl must not be empty");
        }

        let mut seen = HashSet::new();
        for app in &self.applications {
            if !seen.insert(&app.name) {
                anyhow::bail!("Duplicate application name: {}", app.name);
            }
            if app.install.is_empty() {
                anyhow::bail!("Application '{}' has an empty install command", app.name);
            }
            if app.build.is_empty() {
                anyhow::bail!("Application '{}' has an empty build command", app.name);
            }
        }

        let mut seen = HashSet::new();
        for version in &self.versions {
            if !seen.insert(&version.name) {
                anyhow::bail!("Duplicate version probe name: {}", version.name);
            }
            if version.program.trim().is_empty() {
                anyhow::bail!("Version probe '{}' has no program", version.name);
            }
        }

        Ok(())
    }

    /// Find an application by name
    pub fn application(&self, name: &str) -> Option<&ApplicationConfig> {
        self.applications.iter().find(|app| app.name == name)
    }

    /// Find a version probe by name
    pub fn version_probe(&self, name: &str) -> Option<&VersionProbeConfig> {
        self.versions.iter().find(|probe| probe.name == name)
    }
}
