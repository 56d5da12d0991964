//! # Log Router CLI
//!
//! Command-line entry point standing in for the hosting runtime's trigger.
//!
//! Provides:
//! - Configuration loading and validation
//! - Routing one batch through in-memory (or AWS) collaborators

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use contracts::{LogLevel, RouterConfig};
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{load_config, run_batch, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logging is configured from the loaded settings, so load them first
    let loaded = load_config(cli.command.config_path());
    init_logging(&cli, loaded.as_ref().ok())?;

    info!(version = env!("CARGO_PKG_VERSION"), "Log router starting");

    let result = match &cli.command {
        Commands::Run(args) => match loaded {
            Ok(config) => run_batch(args, &config).await,
            Err(e) => Err(e),
        },
        Commands::Validate(args) => run_validate(args, loaded),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

fn init_logging(cli: &Cli, config: Option<&RouterConfig>) -> Result<()> {
    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: cli.metrics_port,
        ..ObservabilityConfig::for_level(log_level(cli, config))
    })
}

/// `-q` / `-v` win over the configured level; INFO when nothing loaded
fn log_level(cli: &Cli, config: Option<&RouterConfig>) -> LogLevel {
    if cli.quiet {
        return LogLevel::Warn;
    }
    match cli.verbose {
        0 => config.map(RouterConfig::log_level).unwrap_or_default(),
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(level: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "log_level = \"{level}\"\n[object_store]\nbucket = \"b\"\npath_prefix = \"logs\"\nregion = \"r\"\n"
        )
        .unwrap();
        file
    }

    fn parse(flags: &[&str], config: &std::path::Path) -> Cli {
        let mut argv = vec!["log-router"];
        argv.extend_from_slice(flags);
        argv.extend(["validate", "--config", config.to_str().unwrap()]);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_level_from_config_file() {
        let file = config_file("DEBUG");
        let cli = parse(&[], file.path());

        let config = load_config(cli.command.config_path()).unwrap();
        assert_eq!(log_level(&cli, Some(&config)), LogLevel::Debug);
    }

    #[test]
    fn test_flags_override_config_level() {
        let file = config_file("DEBUG");
        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(log_level(&parse(&["-q"], file.path()), Some(&config)), LogLevel::Warn);
        assert_eq!(log_level(&parse(&["-vv"], file.path()), Some(&config)), LogLevel::Trace);
    }

    #[test]
    fn test_unloadable_config_logs_at_info() {
        let file = config_file("DEBUG");
        let cli = parse(&[], file.path());
        assert_eq!(log_level(&cli, None), LogLevel::Info);
    }
}
