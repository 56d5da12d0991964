//! # Config Loader
//!
//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Read settings from the environment (or any name -> value lookup)
//! - Parse TOML/JSON configuration files
//! - Validate before any message is processed
//! - Produce a `RouterConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//!
//! let config = ConfigLoader::from_env().unwrap();
//! println!("Bucket: {}", config.object_store.bucket);
//! ```

mod env;
mod validator;

pub use contracts::RouterConfig;
pub use env::{
    ENV_DEFAULT_SINK, ENV_INBOUND_QUEUE, ENV_LOG_LEVEL, ENV_LOOKUP_TABLE, ENV_S3_BUCKET,
    ENV_S3_COMPRESSION, ENV_S3_PATH, ENV_S3_REGION,
};

use contracts::ContractError;
use std::path::Path;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Parse `content` in this format
    fn parse(self, content: &str) -> Result<RouterConfig, ContractError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| parse_error("TOML", e)),
            Self::Json => serde_json::from_str(content).map_err(|e| parse_error("JSON", e)),
        }
    }
}

fn parse_error<E>(format: &str, error: E) -> ContractError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ContractError::ConfigParse {
        message: format!("{format} parse error: {error}"),
        source: Some(Box::new(error)),
    }
}

/// Configuration loader
///
/// Provides static methods to load configuration from the environment,
/// files or strings. Every method validates its result.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    /// - Missing required variable (`S3_BUCKET`, `S3_PATH`, `S3_REGION`, `LOG_LEVEL`)
    /// - Validation failure
    pub fn from_env() -> Result<RouterConfig, ContractError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary name -> value source
    pub fn from_lookup<F>(lookup: F) -> Result<RouterConfig, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = env::from_lookup(lookup)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RouterConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<RouterConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already-built configuration
    pub fn validate(config: &RouterConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize RouterConfig to TOML string
    pub fn to_toml(config: &RouterConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize RouterConfig to JSON string
    pub fn to_json(config: &RouterConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RouterConfig, ContractError> {
        let config = format.parse(content)?;
        validator::validate(&config)?;
        Ok(config)
    }
}
