//! Routing types - lookup key, lookup record and the resolved sink

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AttributeError, AttributeName, InboundMessage};

/// Composite key into the destination lookup table
///
/// Both components are non-empty; there is no way to build one otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    application: String,
    version: String,
}

impl LookupKey {
    /// Build a key, rejecting empty components
    pub fn new(application: impl Into<String>, version: impl Into<String>) -> Option<Self> {
        let application = application.into();
        let version = version.into();
        if application.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self {
            application,
            version,
        })
    }

    /// Read application name and version off a message
    pub fn from_message(message: &InboundMessage) -> Result<Self, AttributeError> {
        let application = message.attribute(AttributeName::ApplicationName)?;
        let version = message.attribute(AttributeName::ApplicationVersion)?;
        Ok(Self {
            application: application.to_string(),
            version: version.to_string(),
        })
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.application, self.version)
    }
}

/// Row of the application lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application: String,
    pub version: String,
    /// Configured sink; may be empty, which counts as "not configured"
    #[serde(default, alias = "loghandler")]
    pub sink_name: String,
}

impl ApplicationRecord {
    pub fn new(
        application: impl Into<String>,
        version: impl Into<String>,
        sink_name: impl Into<String>,
    ) -> Self {
        Self {
            application: application.into(),
            version: version.into(),
            sink_name: sink_name.into(),
        }
    }

    pub fn key(&self) -> Option<LookupKey> {
        LookupKey::new(self.application.clone(), self.version.clone())
    }
}

/// Where a message goes
///
/// Closed set: adding a sink kind means extending every match on this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedSink {
    /// Downstream queue, addressed by logical name
    Queue(String),
    /// Columnar record in the configured object store
    ObjectStore,
}

impl ResolvedSink {
    /// Interpret a configured sink name
    ///
    /// Returns `None` for an empty name. The reserved default sink name
    /// selects the object store rather than a queue of that name.
    pub fn from_sink_name(sink_name: &str, default_sink_name: &str) -> Option<Self> {
        if sink_name.is_empty() {
            None
        } else if sink_name == default_sink_name {
            Some(Self::ObjectStore)
        } else {
            Some(Self::Queue(sink_name.to_string()))
        }
    }

    /// Short label for logs and metrics
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Queue(_) => "queue",
            Self::ObjectStore => "object_store",
        }
    }
}

impl fmt::Display for ResolvedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queue(name) => write!(f, "queue:{name}"),
            Self::ObjectStore => f.write_str("object_store"),
        }
    }
}
