//! Object key layout: `{prefix}/year=YYYY/month=M/day=D/{message_id}.parquet`

use chrono::{Datelike, NaiveDate};

/// File extension of columnar objects
pub const OBJECT_EXTENSION: &str = "parquet";

/// Date partition path, month and day not zero-padded
pub fn date_partition(date: NaiveDate) -> String {
    format!(
        "year={}/month={}/day={}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Full object key for one message written on `date`
///
/// Leading/trailing separators on the prefix are dropped so the key never
/// contains an empty segment.
pub fn object_key(prefix: &str, date: NaiveDate, message_id: &str) -> String {
    let partition = date_partition(date);
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{partition}/{message_id}.{OBJECT_EXTENSION}")
    } else {
        format!("{prefix}/{partition}/{message_id}.{OBJECT_EXTENSION}")
    }
}
