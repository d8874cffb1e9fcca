//! Runner entry point for the Overseer worker-bot runtime.
//!
//! Launches the configured agents sequentially (with a fixed inter-launch
//! delay so the connection layer is never flooded), then routes stdin
//! chat lines to them: `!name profession miner on`, `craftar machado`,
//! `!all stop`, and friends.
//!
//! Agents here run against the in-memory simulated world -- the dry-run
//! harness. A connected game client slots in by implementing the same
//! `World` trait.

mod agent;
mod commands;
mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use overseer_professions::RoleKind;
use overseer_world::LocationStore;

use crate::agent::BotAgent;
use crate::commands::{parse, Command, Target};
use crate::config::RunnerConfig;

/// Command inbox depth per agent.
const COMMAND_BUFFER: usize = 32;

struct AgentHandle {
    name: String,
    inbox: mpsc::Sender<Command>,
}

/// Application entry point.
///
/// Initializes logging, loads configuration, launches agents one at a
/// time, then runs the stdin command loop until EOF.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("overseer-runner starting");

    let config = RunnerConfig::load("overseer.yaml")?;
    info!(
        agents = config.agents.len(),
        launch_delay_ms = config.launch_delay_ms,
        command_timeout_secs = config.command_timeout_secs,
        locations_file = %config.locations_file,
        "configuration loaded"
    );

    let categories = Arc::new(config.categories.clone());
    let command_timeout = Duration::from_secs(config.command_timeout_secs);

    // Launch agents sequentially with the configured delay.
    let mut handles = Vec::new();
    for agent_config in &config.agents {
        // Each agent gets its own store handle over the shared file;
        // coordination happens through that file and the world itself.
        let locations = Arc::new(LocationStore::new(config.locations_file.clone()));
        let mut agent = BotAgent::new(
            agent_config.name.clone(),
            locations,
            Arc::clone(&categories),
            command_timeout,
        );

        for profession in &agent_config.professions {
            match RoleKind::from_name(profession) {
                Some(role) => {
                    agent.manager_mut().enable(role);
                }
                None => warn!(
                    agent = %agent_config.name,
                    profession = %profession,
                    "unknown startup profession"
                ),
            }
        }

        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        handles.push(AgentHandle {
            name: agent.name().to_owned(),
            inbox: tx,
        });
        info!(agent = %agent_config.name, "launching agent");
        tokio::spawn(agent.run(rx));

        tokio::time::sleep(Duration::from_millis(config.launch_delay_ms)).await;
    }

    info!("all agents launched, reading commands from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let Some((target, command)) = parse(&line) else {
            warn!(input = %line, "unrecognized command");
            continue;
        };
        route(&handles, &target, command).await;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Deliver a command to the addressed agents.
async fn route(handles: &[AgentHandle], target: &Target, command: Command) {
    for handle in handles {
        let addressed = match target {
            Target::All => true,
            Target::Named(name) => handle.name.eq_ignore_ascii_case(name),
        };
        if !addressed {
            continue;
        }
        if handle.inbox.send(command.clone()).await.is_err() {
            warn!(agent = %handle.name, "agent inbox closed");
        }
    }
}
