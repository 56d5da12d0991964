//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Log Router - routes queued log messages to per-application sinks
#[derive(Parser, Debug)]
#[command(
    name = "log-router",
    author,
    version,
    about = "Route log messages to downstream queues or columnar storage",
    long_about = "Routes each message of an inbound queue batch to the sink configured for its\n\
                  application and version, falling back to columnar objects in the object store,\n\
                  and removes delivered messages from the inbound queue."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "LOG_ROUTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (disabled when unset)
    #[arg(long, global = true, env = "LOG_ROUTER_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route one batch of inbound messages
    Run(RunArgs),

    /// Validate configuration without routing anything
    Validate(ValidateArgs),
}

impl Commands {
    /// Configuration file named by the command, if any
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Run(args) => args.config.as_deref(),
            Self::Validate(args) => args.config.as_deref(),
        }
    }
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Queue event JSON holding the batch (`{"Records": [...]}`)
    #[arg(short, long, env = "LOG_ROUTER_BATCH")]
    pub batch: PathBuf,

    /// Configuration file (TOML or JSON); environment variables when omitted
    #[arg(short, long, env = "LOG_ROUTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lookup records (JSON array of {application, version, sink_name}) for in-memory routing
    #[arg(short, long)]
    pub routes: Option<PathBuf>,

    /// Write object-store output under this directory instead of keeping it in memory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,

    /// Use DynamoDB, SQS and S3 instead of in-memory collaborators
    #[cfg(feature = "aws")]
    #[arg(long, conflicts_with_all = ["routes", "output_dir"])]
    pub aws: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate; environment variables when omitted
    #[arg(short, long, env = "LOG_ROUTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "log-router",
            "-v",
            "--log-format",
            "compact",
            "run",
            "--batch",
            "event.json",
            "--routes",
            "routes.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.log_format, LogFormat::Compact);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.batch, PathBuf::from("event.json"));
        assert_eq!(args.routes, Some(PathBuf::from("routes.json")));
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn test_config_path_from_either_command() {
        let run = Cli::try_parse_from(["log-router", "run", "-b", "e.json", "-c", "router.toml"])
            .unwrap();
        assert_eq!(run.command.config_path(), Some(Path::new("router.toml")));

        let validate = Cli::try_parse_from(["log-router", "validate"]).unwrap();
        assert_eq!(validate.command.config_path(), None);
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["log-router", "validate", "--json"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert!(args.json);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["log-router", "-q", "-v", "validate"]).is_err());
    }
}
