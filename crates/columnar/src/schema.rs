//! Record schema and compression mapping

use std::sync::{Arc, LazyLock};

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use contracts::Compression;

pub const COL_TIME: &str = "time";
pub const COL_TRACKING_ID: &str = "trackingId";
pub const COL_MESSAGE_ID: &str = "messageId";
pub const COL_LEVEL: &str = "level";
pub const COL_APPLICATION: &str = "application";
pub const COL_VERSION: &str = "version";
pub const COL_MESSAGE: &str = "message";

/// Column names in schema order
pub const COLUMNS: [&str; 7] = [
    COL_TIME,
    COL_TRACKING_ID,
    COL_MESSAGE_ID,
    COL_LEVEL,
    COL_APPLICATION,
    COL_VERSION,
    COL_MESSAGE,
];

static RECORD_SCHEMA: LazyLock<SchemaRef> = LazyLock::new(|| {
    Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ))
});

/// Schema for one log record: seven non-null UTF-8 columns
pub fn record_schema() -> SchemaRef {
    Arc::clone(&RECORD_SCHEMA)
}

/// Convert to parquet compression type
pub fn codec(compression: Compression) -> parquet::basic::Compression {
    match compression {
        Compression::None => parquet::basic::Compression::UNCOMPRESSED,
        Compression::Snappy => parquet::basic::Compression::SNAPPY,
        Compression::Lz4 => parquet::basic::Compression::LZ4,
        Compression::Zstd => parquet::basic::Compression::ZSTD(Default::default()),
    }
}
