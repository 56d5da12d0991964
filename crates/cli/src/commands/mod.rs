//! Command implementations.

mod run;
mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::RouterConfig;

use crate::error::ensure_exists;

pub use run::run_batch;
pub use validate::run_validate;

/// Load configuration from a file when given, else from the environment
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig> {
    match path {
        Some(path) => {
            ensure_exists("Configuration", path)?;
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => ConfigLoader::from_env().context("Failed to load config from environment"),
    }
}
