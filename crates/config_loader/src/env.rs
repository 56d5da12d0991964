//! Environment-variable configuration source
//!
//! Reads through a lookup function so callers (and tests) choose where values
//! come from. Empty values count as absent.

use contracts::{Compression, ContractError, ObjectStoreConfig, RouterConfig};

pub const ENV_S3_BUCKET: &str = "S3_BUCKET";
pub const ENV_S3_PATH: &str = "S3_PATH";
pub const ENV_S3_REGION: &str = "S3_REGION";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_S3_COMPRESSION: &str = "S3_COMPRESSION";
pub const ENV_LOOKUP_TABLE: &str = "APPLICATION_TABLE";
pub const ENV_INBOUND_QUEUE: &str = "INBOUND_QUEUE";
pub const ENV_DEFAULT_SINK: &str = "DEFAULT_SINK";

/// Build a config from named values
///
/// Required settings are checked in the order bucket, path, region, log
/// level; the first absent one is reported by its variable name.
pub fn from_lookup<F>(lookup: F) -> Result<RouterConfig, ContractError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let require = |name: &str| get(name).ok_or_else(|| ContractError::missing_setting(name));

    let bucket = require(ENV_S3_BUCKET)?;
    let path_prefix = require(ENV_S3_PATH)?;
    let region = require(ENV_S3_REGION)?;
    let log_level = require(ENV_LOG_LEVEL)?;

    let mut object_store = ObjectStoreConfig::new(bucket, path_prefix, region);
    if let Some(codec) = get(ENV_S3_COMPRESSION) {
        object_store.compression = Compression::parse(&codec).ok_or_else(|| {
            ContractError::config_validation(
                ENV_S3_COMPRESSION,
                format!("unknown compression codec '{codec}'"),
            )
        })?;
    }

    let mut config = RouterConfig::new(object_store, log_level);
    if let Some(table) = get(ENV_LOOKUP_TABLE) {
        config.lookup_table_name = table;
    }
    if let Some(queue) = get(ENV_INBOUND_QUEUE) {
        config.inbound_queue_name = queue;
    }
    if let Some(sink) = get(ENV_DEFAULT_SINK) {
        config.default_sink_name = sink;
    }

    Ok(config)
}
