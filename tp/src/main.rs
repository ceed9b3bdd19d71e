//! travelplanner CLI
//!
//! Reads a travel request file, runs the research and planning pipeline and
//! prints the itinerary.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use travelplanner::cli::{Cli, Command, OutputFormat, generate_after_help};
use travelplanner::config::Config;
use travelplanner::domain::{PipelineCredentials, Request};
use travelplanner::pipeline::{Orchestrator, PipelineOutcome};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("travelplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        research_model = %config.llm.research_model,
        planning_model = %config.llm.planning_model,
        search = %config.search.provider,
        "travelplanner loaded config"
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan { request, output } => {
            debug!(?request, ?output, "main: matched Plan command");
            cmd_plan(&config, &request, output.as_deref()).await
        }
        Command::Research { request, format } => {
            debug!(?request, %format, "main: matched Research command");
            cmd_research(&config, &request, format).await
        }
        Command::Config => {
            debug!("main: matched Config command");
            cmd_config(&config)
        }
    }
}

fn load_request(path: &Path) -> Result<Request> {
    debug!(?path, "load_request: called");
    let content = fs::read_to_string(path).context(format!("Failed to read request {}", path.display()))?;
    Request::from_yaml(&content).map_err(|e| eyre!("VALIDATION_ERROR: {}", e))
}

fn orchestrator(config: &Config) -> Result<Orchestrator> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    Ok(Orchestrator::from_config(config, root))
}

async fn cmd_plan(config: &Config, request_path: &Path, output: Option<&Path>) -> Result<()> {
    debug!(?request_path, "cmd_plan: called");
    let request = load_request(request_path)?;
    let credentials = PipelineCredentials::from_env(config);

    println!(
        "{} {} ({} days, {})",
        "Planning".cyan().bold(),
        request.destination(),
        request.trip_days(),
        request.pace().name()
    );

    let run = orchestrator(config)?.run_request(request, &credentials).await;
    info!(run_id = %run.id, phase = %run.phase(), "cmd_plan: run finished");

    match run.outcome {
        PipelineOutcome::Done(document) => {
            for warning in document.warnings() {
                eprintln!("{} {}", "warning:".yellow().bold(), warning);
            }
            println!();
            println!("{}", document);

            if let Some(path) = output {
                document
                    .export(path)
                    .context(format!("Failed to write itinerary to {}", path.display()))?;
                println!("{} {}", "Saved itinerary to".green(), path.display());
            }
            Ok(())
        }
        PipelineOutcome::Failed(err) => Err(eyre!("{}: {}", err.kind(), err)),
    }
}

async fn cmd_research(config: &Config, request_path: &Path, format: OutputFormat) -> Result<()> {
    debug!(?request_path, "cmd_research: called");
    let request = load_request(request_path)?;
    let credentials = PipelineCredentials::from_env(config);

    let output = orchestrator(config)?
        .research(&request, &credentials)
        .await
        .map_err(|err| eyre!("{}: {}", err.kind(), err))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => {
            println!("{} {}", "Query:".cyan().bold(), output.query);
            if output.sources.is_empty() {
                println!("{}", "No sources found".yellow());
            }
            for (i, source) in output.sources.iter().enumerate() {
                println!("{:>2}. {}", i + 1, source.markdown_link());
                if !source.snippet.is_empty() {
                    println!("    {}", source.snippet.dimmed());
                }
            }
        }
    }
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    debug!("cmd_config: called");
    print!("{}", serde_yaml::to_string(config).context("Failed to serialize config")?);
    Ok(())
}
