//! Columnar encoder error types

use arrow::error::ArrowError;
use contracts::AttributeError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Encoding and decoding errors
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A required column has no value on the message
    #[error("cannot build columnar record: {0}")]
    Attribute(#[from] AttributeError),

    /// Record batch construction failed
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet write/read failed
    #[error("parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Buffer does not match the record schema
    #[error("schema mismatch: {message}")]
    Schema { message: String },
}

impl EncodeError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}
