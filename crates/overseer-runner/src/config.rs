//! Configuration loading for the runner.
//!
//! The canonical configuration lives in `overseer.yaml` next to the
//! binary. All fields have defaults, and a missing file simply yields the
//! default configuration, so a bare `overseer-runner` starts one idle
//! agent.

use std::path::Path;

use serde::Deserialize;

use overseer_types::CategoryTable;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// One agent to launch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// The agent's name (used as its chat prefix).
    pub name: String,
    /// Professions enabled at startup.
    #[serde(default)]
    pub professions: Vec<String>,
}

/// Complete runner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunnerConfig {
    /// Agents to launch, in order.
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,

    /// Delay between agent launches, in milliseconds. Agents connect one
    /// at a time so the connection layer is never flooded.
    #[serde(default = "default_launch_delay_ms")]
    pub launch_delay_ms: u64,

    /// Wall-clock deadline for one-shot command navigation, in seconds.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Path of the shared location store file.
    #[serde(default = "default_locations_file")]
    pub locations_file: String,

    /// Storage category taxonomy override (the built-in table applies
    /// when omitted).
    #[serde(default)]
    pub categories: CategoryTable,
}

fn default_agents() -> Vec<AgentConfig> {
    vec![AgentConfig {
        name: "worker-1".to_owned(),
        professions: Vec::new(),
    }]
}

const fn default_launch_delay_ms() -> u64 {
    1000
}

const fn default_command_timeout_secs() -> u64 {
    30
}

fn default_locations_file() -> String {
    "locations.json".to_owned()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            agents: default_agents(),
            launch_delay_ms: default_launch_delay_ms(),
            command_timeout_secs: default_command_timeout_secs(),
            locations_file: default_locations_file(),
            categories: CategoryTable::default(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a YAML file; a missing file yields the
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        let config: Self = serde_yml::from_str(&raw)?;
        Ok(config)
    }
}
