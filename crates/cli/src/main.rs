//! AutoAgent CLI - run an autonomous agent against a goal.

use anyhow::{Context, Result};
use autoagent_api::{HttpAgentApi, HttpApiConfig};
use autoagent_core::{ModelSettings, Session};
use autoagent_execution::{
    AutonomousAgent, ChannelMessageService, EngineConfig, InMemoryRunModel, RunModel, RunOutcome,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autoagent")]
#[command(about = "Autonomous agent execution engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an agent until its goal is done, it is stopped, or Ctrl-C
    Run {
        /// Goal to work toward
        #[arg(long)]
        goal: String,
        /// Base URL of the agent platform
        #[arg(long, default_value = "http://localhost:8000")]
        api_url: String,
        /// Model settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Override the model from the settings
        #[arg(long)]
        model: Option<String>,
        /// Override the answer language from the settings
        #[arg(long)]
        language: Option<String>,
        /// Bearer token for the platform
        #[arg(long)]
        token: Option<String>,
        /// Wait between retries of a failed call
        #[arg(long, default_value = "2000")]
        retry_backoff_ms: u64,
        /// Delay between registering successive tasks
        #[arg(long, default_value = "150")]
        task_pacing_ms: u64,
        /// Per-request timeout
        #[arg(long, default_value = "120")]
        timeout_secs: u64,
        /// Ask for a summary of the results once the run completes
        #[arg(long)]
        summarize: bool,
    },
    /// Print the default model settings
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            goal,
            api_url,
            settings,
            model: model_name,
            language,
            token,
            retry_backoff_ms,
            task_pacing_ms,
            timeout_secs,
            summarize,
        } => {
            let mut settings = match settings {
                Some(path) => load_settings(&path).await?,
                None => ModelSettings::default(),
            };
            if let Some(model_name) = model_name {
                settings = settings.with_model(model_name);
            }
            if let Some(language) = language {
                settings = settings.with_language(language);
            }
            let api = HttpAgentApi::new(
                HttpApiConfig::new(api_url).with_timeout(Duration::from_secs(timeout_secs)),
            )?;

            let model = Arc::new(InMemoryRunModel::new(goal));
            let (messages, mut rx) = ChannelMessageService::new();
            let agent = AutonomousAgent::new(
                model.clone(),
                Arc::new(messages),
                settings,
                Arc::new(api),
                token.map(Session::new),
            )
            .with_config(
                EngineConfig::new()
                    .with_retry_backoff(Duration::from_millis(retry_backoff_ms))
                    .with_task_pacing(Duration::from_millis(task_pacing_ms)),
            );

            let printer = tokio::spawn(async move {
                while let Some(message) = rx.recv().await {
                    println!("{}", message);
                }
            });

            let mut lifecycle = model.subscribe();
            tokio::spawn(async move {
                while lifecycle.changed().await.is_ok() {
                    info!("Agent is {}", *lifecycle.borrow_and_update());
                }
            });

            let control = agent.control();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, stopping agent");
                    control.stop();
                }
            });

            info!("Starting run {}", model.id());
            let outcome = agent.run().await?;
            if summarize && outcome == RunOutcome::Completed {
                agent.summarize().await?;
            }
            info!(
                "Run {} ended ({:?}), {} result(s) recorded",
                model.id(),
                outcome,
                model.completed_tasks().len()
            );

            // Dropping the agent closes the message channel
            drop(agent);
            printer.await?;
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&ModelSettings::default())?);
        }
    }

    Ok(())
}

async fn load_settings(path: &Path) -> Result<ModelSettings> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}
