//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::RouterConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    bucket: String,
    path_prefix: String,
    region: String,
    compression: String,
    log_level: String,
    lookup_table: String,
    inbound_queue: String,
    default_sink: String,
}

impl From<&RouterConfig> for ConfigSummary {
    fn from(config: &RouterConfig) -> Self {
        Self {
            bucket: config.object_store.bucket.clone(),
            path_prefix: config.object_store.path_prefix.clone(),
            region: config.object_store.region.clone(),
            compression: format!("{:?}", config.object_store.compression).to_lowercase(),
            log_level: config.log_level().to_string(),
            lookup_table: config.lookup_table_name.clone(),
            inbound_queue: config.inbound_queue_name.clone(),
            default_sink: config.default_sink_name.clone(),
        }
    }
}

/// Execute the `validate` command against an already attempted load
pub fn run_validate(args: &ValidateArgs, loaded: Result<RouterConfig>) -> Result<()> {
    let source = args
        .config
        .as_ref()
        .map_or_else(|| "environment".to_string(), |p| p.display().to_string());
    info!(source = %source, "Validating configuration");

    let result = match loaded {
        Ok(config) => ValidationResult {
            valid: true,
            source,
            error: None,
            warnings: collect_warnings(&config),
            summary: Some(ConfigSummary::from(&config)),
        },
        Err(e) => ValidationResult {
            valid: false,
            source,
            error: Some(format!("{e:#}")),
            warnings: Vec::new(),
            summary: None,
        },
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    match result.error {
        None => Ok(()),
        Some(error) => Err(CliError::config_validation(error).into()),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &RouterConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let level = config.log_level.trim().to_ascii_uppercase();
    if !matches!(
        level.as_str(),
        "TRACE" | "DEBUG" | "INFO" | "WARN" | "WARNING" | "ERROR"
    ) {
        warnings.push(format!(
            "log_level '{}' is not recognised - using INFO",
            config.log_level
        ));
    }

    if config.object_store.path_prefix.starts_with('/') || config.object_store.path_prefix.ends_with('/') {
        warnings.push(format!(
            "path_prefix '{}' has leading/trailing '/' - it will be trimmed",
            config.object_store.path_prefix
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.source);

        if let Some(ref summary) = result.summary {
            println!(
                "\n  Object store: s3://{}/{} ({})",
                summary.bucket, summary.path_prefix, summary.region
            );
            println!("  Compression: {}", summary.compression);
            println!("  Log level: {}", summary.log_level);
            println!("  Lookup table: {}", summary.lookup_table);
            println!("  Inbound queue: {}", summary.inbound_queue);
            println!("  Default sink: {}", summary.default_sink);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
