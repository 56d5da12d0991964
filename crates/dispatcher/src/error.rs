//! Dispatcher error types

use columnar::EncodeError;
use contracts::ContractError;
use thiserror::Error;

/// Delivery failures; all are local to one message
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Sink name resolved to no queue address
    #[error("no queue address found for sink '{sink}'")]
    QueueAddressNotFound { sink: String },

    /// Address resolution or send failed in transport
    #[error("delivery to sink '{sink}' failed: {source}")]
    DeliveryFailed {
        sink: String,
        #[source]
        source: ContractError,
    },

    /// Message could not be converted to a columnar record
    #[error("columnar encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// Object store write failed
    #[error("object write to '{key}' failed: {source}")]
    StorageWriteFailed {
        key: String,
        #[source]
        source: ContractError,
    },
}

impl DeliveryError {
    pub fn queue_address_not_found(sink: impl Into<String>) -> Self {
        Self::QueueAddressNotFound { sink: sink.into() }
    }

    pub fn delivery_failed(sink: impl Into<String>, source: ContractError) -> Self {
        Self::DeliveryFailed {
            sink: sink.into(),
            source,
        }
    }

    pub fn storage_write_failed(key: impl Into<String>, source: ContractError) -> Self {
        Self::StorageWriteFailed {
            key: key.into(),
            source,
        }
    }

    /// Short label for logs and metrics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::QueueAddressNotFound { .. } => "queue_address_not_found",
            Self::DeliveryFailed { .. } => "delivery_failed",
            Self::Encode(_) => "encode_failed",
            Self::StorageWriteFailed { .. } => "storage_write_failed",
        }
    }
}
