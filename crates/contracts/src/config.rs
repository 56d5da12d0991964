//! RouterConfig - Config Loader output
//!
//! Built once at startup and passed by reference into the router.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Name of the application lookup table
pub const DEFAULT_LOOKUP_TABLE: &str = "application";

/// Inbound queue the router consumes (and deletes from)
pub const DEFAULT_INBOUND_QUEUE: &str = "logging_queue.fifo";

/// Sink name that selects the object store instead of a queue
pub const DEFAULT_SINK_NAME: &str = "S3QUEUE";

/// Complete router configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RouterConfig {
    /// Fallback object store location
    #[validate(nested)]
    pub object_store: ObjectStoreConfig,

    /// Logging verbosity (TRACE/DEBUG/INFO/WARN/ERROR)
    #[validate(length(min = 1, code = "missing"))]
    pub log_level: String,

    /// Lookup table holding application -> sink rows
    #[serde(default = "default_lookup_table")]
    #[validate(length(min = 1, code = "missing"))]
    pub lookup_table_name: String,

    /// Inbound queue name, resolved for the deletion step
    #[serde(default = "default_inbound_queue")]
    #[validate(length(min = 1, code = "missing"))]
    pub inbound_queue_name: String,

    /// Reserved sink name meaning "use the object store"
    #[serde(default = "default_sink_name")]
    #[validate(length(min = 1, code = "missing"))]
    pub default_sink_name: String,
}

impl RouterConfig {
    /// Config with the given object store and defaults everywhere else
    pub fn new(object_store: ObjectStoreConfig, log_level: impl Into<String>) -> Self {
        Self {
            object_store,
            log_level: log_level.into(),
            lookup_table_name: default_lookup_table(),
            inbound_queue_name: default_inbound_queue(),
            default_sink_name: default_sink_name(),
        }
    }

    /// Parsed verbosity
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse_lenient(&self.log_level)
    }
}

/// Object store settings for the fallback sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ObjectStoreConfig {
    #[validate(length(min = 1, code = "missing"))]
    pub bucket: String,

    /// Key prefix; date partitions and the object name are appended
    #[validate(length(min = 1, code = "missing"))]
    pub path_prefix: String,

    #[validate(length(min = 1, code = "missing"))]
    pub region: String,

    /// Columnar compression codec
    #[serde(default)]
    pub compression: Compression,
}

impl ObjectStoreConfig {
    pub fn new(
        bucket: impl Into<String>,
        path_prefix: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            path_prefix: path_prefix.into(),
            region: region.into(),
            compression: Compression::default(),
        }
    }
}

fn default_lookup_table() -> String {
    DEFAULT_LOOKUP_TABLE.to_string()
}

fn default_inbound_queue() -> String {
    DEFAULT_INBOUND_QUEUE.to_string()
}

fn default_sink_name() -> String {
    DEFAULT_SINK_NAME.to_string()
}

/// Logging verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse case-insensitively; anything unrecognised is `Info`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Self::Trace,
            "DEBUG" => Self::Debug,
            "WARN" | "WARNING" => Self::Warn,
            "ERROR" => Self::Error,
            _ => Self::Info,
        }
    }

    /// Directive understood by tracing's env filter
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Columnar compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// No compression
    None,
    /// Snappy compression (fast, moderate ratio)
    #[default]
    Snappy,
    /// LZ4 compression (very fast, lower ratio)
    Lz4,
    /// Zstd compression (slower, best ratio)
    Zstd,
}

impl Compression {
    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "uncompressed" => Some(Self::None),
            "snappy" => Some(Self::Snappy),
            "lz4" => Some(Self::Lz4),
            "zstd" => Some(Self::Zstd),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_lenient() {
        assert_eq!(LogLevel::parse_lenient("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::parse_lenient("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse_lenient("Warn"), LogLevel::Warn);
        assert_eq!(LogLevel::parse_lenient("chatty"), LogLevel::Info);
        assert_eq!(LogLevel::Error.as_filter(), "error");
    }

    #[test]
    fn test_compression_parse() {
        assert_eq!(Compression::parse("ZSTD"), Some(Compression::Zstd));
        assert_eq!(Compression::parse("uncompressed"), Some(Compression::None));
        assert_eq!(Compression::parse("gzip"), None);
    }

    #[test]
    fn test_new_fills_defaults() {
        let config = RouterConfig::new(ObjectStoreConfig::new("b", "logs", "eu-west-1"), "INFO");
        assert_eq!(config.lookup_table_name, "application");
        assert_eq!(config.inbound_queue_name, "logging_queue.fifo");
        assert_eq!(config.default_sink_name, "S3QUEUE");
        assert_eq!(config.object_store.compression, Compression::Snappy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_flags_empty_bucket() {
        let config = RouterConfig::new(ObjectStoreConfig::new("", "logs", "eu-west-1"), "INFO");
        assert!(config.validate().is_err());
    }
}
