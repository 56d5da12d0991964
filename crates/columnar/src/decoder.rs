//! Read parquet objects written by the encoder back into records

use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use contracts::ColumnarRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::EncodeError;
use crate::schema::{
    COL_APPLICATION, COL_LEVEL, COL_MESSAGE, COL_MESSAGE_ID, COL_TIME, COL_TRACKING_ID,
    COL_VERSION,
};

/// Decode every row of a parquet buffer
pub fn decode(buffer: Bytes) -> Result<Vec<ColumnarRecord>, EncodeError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(buffer)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        append_batch(&batch?, &mut records)?;
    }
    Ok(records)
}

fn append_batch(batch: &RecordBatch, out: &mut Vec<ColumnarRecord>) -> Result<(), EncodeError> {
    let time = string_column(batch, COL_TIME)?;
    let tracking_id = string_column(batch, COL_TRACKING_ID)?;
    let message_id = string_column(batch, COL_MESSAGE_ID)?;
    let level = string_column(batch, COL_LEVEL)?;
    let application = string_column(batch, COL_APPLICATION)?;
    let version = string_column(batch, COL_VERSION)?;
    let message = string_column(batch, COL_MESSAGE)?;

    for row in 0..batch.num_rows() {
        out.push(ColumnarRecord {
            time: time.value(row).to_string(),
            tracking_id: tracking_id.value(row).to_string(),
            message_id: message_id.value(row).to_string(),
            level: level.value(row).to_string(),
            application: application.value(row).to_string(),
            version: version.value(row).to_string(),
            message: message.value(row).to_string(),
        });
    }
    Ok(())
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, EncodeError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| EncodeError::schema(format!("missing column '{name}'")))?;
    if column.null_count() > 0 {
        return Err(EncodeError::schema(format!("column '{name}' contains nulls")));
    }
    column
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| EncodeError::schema(format!("column '{name}' is not UTF-8")))
}
