//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// TripDaemon - checkpointed trip-planning pipeline
#[derive(Parser)]
#[command(
    name = "tripd",
    about = "Trip-planning pipeline with per-thread checkpointing",
    version,
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
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default when no command is given)
    Serve,

    /// Plan a trip from the command line
    Plan {
        /// Thread to plan under (a new one is generated when omitted)
        #[arg(short, long)]
        thread_id: Option<String>,

        /// Destination to plan for
        destination: String,

        /// Total budget
        #[arg(short, long)]
        budget: f64,

        /// Travel dates, free-form (e.g. "10-15 October")
        #[arg(short, long)]
        dates: String,

        /// Preferences, free-form (e.g. "Culture, food, budget-friendly")
        #[arg(short, long, default_value = "")]
        preferences: String,
    },

    /// List saved threads, newest first
    Threads {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the checkpointed turns of a thread
    Show {
        /// Thread ID
        thread_id: String,
    },

    /// Delete a thread and all its checkpoints
    Delete {
        /// Thread ID
        thread_id: String,
    },
}

/// Output format for listing commands
#[derive(Clone, Debug, Default)]
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
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["tripd"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["tripd", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_cli_parse_plan() {
        let cli = Cli::parse_from([
            "tripd",
            "plan",
            "Naran",
            "--budget",
            "60000",
            "--dates",
            "10-15 October",
            "--preferences",
            "Culture, food",
        ]);
        if let Some(Command::Plan {
            thread_id,
            destination,
            budget,
            dates,
            preferences,
        }) = cli.command
        {
            assert!(thread_id.is_none());
            assert_eq!(destination, "Naran");
            assert_eq!(budget, 60000.0);
            assert_eq!(dates, "10-15 October");
            assert_eq!(preferences, "Culture, food");
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_threads_json() {
        let cli = Cli::parse_from(["tripd", "threads", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Some(Command::Threads {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_cli_parse_delete() {
        let cli = Cli::parse_from(["tripd", "delete", "trip-1"]);
        if let Some(Command::Delete { thread_id }) = cli.command {
            assert_eq!(thread_id, "trip-1");
        } else {
            panic!("Expected Delete command");
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["tripd", "-c", "/path/to/config.yml", "serve"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }
}
