//! Layered error definitions
//!
//! Categorized by source: config / attribute / lookup / queue / object store

use thiserror::Error;

/// Failure to read one named attribute off an inbound message.
///
/// Callers decide what a failure means: the resolver falls back to the
/// default sink, the columnar encoder refuses to produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The message carries no attribute map at all
    #[error("message carries no attributes")]
    Missing,

    /// The attribute map has no entry for the name
    #[error("attribute '{name}' not found")]
    NotFound { name: String },

    /// The attribute is present but its value is empty
    #[error("attribute '{name}' is empty")]
    Empty { name: String },
}

impl AttributeError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::Empty { name: name.into() }
    }
}

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Required setting absent or empty
    #[error("required setting '{name}' is not set")]
    MissingSetting { name: String },

    // ===== Attribute Errors =====
    #[error(transparent)]
    Attribute(#[from] AttributeError),

    // ===== Collaborator Errors =====
    /// Lookup table transport or item shape error
    #[error("lookup table '{table}' error: {message}")]
    Lookup { table: String, message: String },

    /// Queue system transport error
    #[error("queue '{queue}' error: {message}")]
    Queue { queue: String, message: String },

    /// Object store transport error
    #[error("object store error for 's3://{bucket}/{key}': {message}")]
    ObjectStore {
        bucket: String,
        key: String,
        message: String,
    },

    /// Inbound event could not be decoded
    #[error("event decode error: {message}")]
    Decode { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing_setting(name: impl Into<String>) -> Self {
        Self::MissingSetting { name: name.into() }
    }

    pub fn lookup(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lookup {
            table: table.into(),
            message: message.into(),
        }
    }

    pub fn queue(queue: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Queue {
            queue: queue.into(),
            message: message.into(),
        }
    }

    pub fn object_store(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ObjectStore {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
