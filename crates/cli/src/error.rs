//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file not found
    #[error("{kind} file not found: {path}")]
    FileNotFound { kind: &'static str, path: String },

    /// Configuration rejected
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },
}

impl CliError {
    pub fn file_not_found(kind: &'static str, path: &Path) -> Self {
        Self::FileNotFound {
            kind,
            path: path.display().to_string(),
        }
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}

/// Fail with `FileNotFound` unless `path` exists
pub fn ensure_exists(kind: &'static str, path: &Path) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::file_not_found(kind, path))
    }
}
