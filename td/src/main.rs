//! TripDaemon - checkpointed trip-planning pipeline
//!
//! CLI entry point for the API server and one-shot planning commands.

use std::fs;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use tripdaemon::cli::{Cli, Command, OutputFormat};
use tripdaemon::config::Config;
use tripdaemon::llm::create_client;
use tripdaemon::pipeline::{PipelineEngine, TripRequest};
use tripdaemon::search::{SearchClient, TavilyClient};
use tripdaemon::server::{self, AppState};
use tripdaemon::state::StateManager;
use tripdaemon::threads::ThreadDirectory;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = if let Some(s) = level_str {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Spawn the state manager on the configured database path
fn spawn_state(config: &Config) -> Result<StateManager> {
    debug!(db_path = %config.storage.db_path.display(), "spawn_state: called");

    if let Some(parent) = config.storage.db_path.parent() {
        fs::create_dir_all(parent).context("Failed to create storage directory")?;
    }

    StateManager::spawn(&config.storage.db_path)
}

/// Wire up the engine and directory from config
///
/// Requires the LLM and search API keys to be present.
fn build_engine(config: &Config, state: &StateManager) -> Result<PipelineEngine> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let search: Arc<dyn SearchClient> =
        Arc::new(TavilyClient::from_config(&config.search).context("Failed to create search client")?);

    Ok(PipelineEngine::new(state.clone(), search, llm, config.llm.max_tokens))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("TripDaemon loaded config: model={}", config.llm.model);

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Serve) | None => {
            debug!("main: matched Serve command");
            cmd_serve(&config).await
        }
        Some(Command::Plan {
            thread_id,
            destination,
            budget,
            dates,
            preferences,
        }) => {
            debug!(?thread_id, %destination, budget, "main: matched Plan command");
            cmd_plan(&config, thread_id, destination, budget, dates, preferences).await
        }
        Some(Command::Threads { format }) => {
            debug!(?format, "main: matched Threads command");
            cmd_threads(&config, format).await
        }
        Some(Command::Show { thread_id }) => {
            debug!(%thread_id, "main: matched Show command");
            cmd_show(&config, &thread_id).await
        }
        Some(Command::Delete { thread_id }) => {
            debug!(%thread_id, "main: matched Delete command");
            cmd_delete(&config, &thread_id).await
        }
    }
}

/// Run the HTTP API server
async fn cmd_serve(config: &Config) -> Result<()> {
    debug!("cmd_serve: called");
    config.validate()?;

    let state = spawn_state(config)?;
    let engine = build_engine(config, &state)?;
    let directory = ThreadDirectory::new(state.clone());

    let app_state = AppState {
        engine: Arc::new(engine),
        directory,
        state,
    };

    server::serve(&config.server, app_state).await
}

/// Plan a trip from the command line
async fn cmd_plan(
    config: &Config,
    thread_id: Option<String>,
    destination: String,
    budget: f64,
    dates: String,
    preferences: String,
) -> Result<()> {
    debug!("cmd_plan: called");
    config.validate()?;

    let state = spawn_state(config)?;
    let engine = build_engine(config, &state)?;

    let thread_id = thread_id.unwrap_or_else(|| uuid::Uuid::now_v7().to_string());

    let request = TripRequest {
        thread_id: thread_id.clone(),
        destination,
        budget,
        dates,
        preferences,
    };

    let state = engine.run(&request).await?;

    println!("Thread: {}", thread_id);
    println!();
    println!("{}", state.plan);
    println!();
    println!("Cost breakdown:");
    for (category, amount) in &state.cost_breakdown {
        println!("  {}: {}", category, amount);
    }

    Ok(())
}

/// List saved threads
async fn cmd_threads(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_threads: called");
    let state = spawn_state(config)?;
    let directory = ThreadDirectory::new(state);

    let threads = directory.list_threads().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&threads)?);
        }
        OutputFormat::Text => {
            if threads.is_empty() {
                println!("No threads saved.");
            }
            for thread in threads {
                println!("{}  {}  ({})", thread.thread_id, thread.thread_name, thread.timestamp);
            }
        }
    }

    Ok(())
}

/// Show the checkpointed turns of a thread
async fn cmd_show(config: &Config, thread_id: &str) -> Result<()> {
    debug!(%thread_id, "cmd_show: called");
    let state = spawn_state(config)?;
    let directory = ThreadDirectory::new(state);

    let turns = directory.fetch_thread(thread_id).await?;
    if turns.is_empty() {
        return Err(eyre::eyre!("Thread not found or no chats available"));
    }

    println!("{}", serde_json::to_string_pretty(&turns)?);
    Ok(())
}

/// Delete a thread and all its checkpoints
async fn cmd_delete(config: &Config, thread_id: &str) -> Result<()> {
    debug!(%thread_id, "cmd_delete: called");
    let state = spawn_state(config)?;

    let removed = state.delete_thread(thread_id).await?;
    debug!(removed, "cmd_delete: checkpoints removed");

    println!("Thread {} deleted successfully", thread_id);
    Ok(())
}
