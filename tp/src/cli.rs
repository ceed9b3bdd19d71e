//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{LlmConfig, SearchConfig};
use crate::domain::DEFAULT_EXPORT_FILE;

/// travelplanner - research and plan day-by-day itineraries
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Research-grounded day-by-day travel itineraries",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Research and plan an itinerary for a request file
    Plan {
        /// Travel request (YAML)
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Also write the itinerary to this file (travel_itinerary.txt if no name is given)
        #[arg(short, long, value_name = "FILE", num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        output: Option<PathBuf>,
    },

    /// Run only the research stage and show the ranked sources
    Research {
        /// Travel request (YAML)
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective configuration
    Config,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelplanner")
        .join("logs")
        .join("travelplanner.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with credential checks and the log location
///
/// Only the default variable names are checked; a config file may point the
/// pipeline at different ones.
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();

    help.push_str("Credentials:\n");
    for var in [LlmConfig::default().api_key_env, SearchConfig::default().api_key_env] {
        let set = std::env::var(&var).is_ok_and(|v| !v.trim().is_empty());
        let icon = if set {
            debug!(%var, "generate_after_help: credential set");
            "\u{2705}"
        } else {
            debug!(%var, "generate_after_help: credential missing");
            "\u{274C}"
        };
        help.push_str(&format!("  {} {}\n", icon, var));
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));

    debug!("generate_after_help: returning help text");
    help
}

/// Output format for the research command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
