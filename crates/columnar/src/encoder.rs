//! ColumnarEncoder - one message in, one parquet object out

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use contracts::{ColumnarRecord, Compression, InboundMessage};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tracing::{debug, instrument};

use crate::error::EncodeError;
use crate::schema::{codec, record_schema};

/// Serialized parquet object ready to be persisted
#[derive(Debug, Clone)]
pub struct EncodedObject {
    pub buffer: Bytes,
    pub size: usize,
}

/// Encodes single messages into parquet buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnarEncoder {
    compression: Compression,
}

impl ColumnarEncoder {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    /// Encode a message as a one-row parquet object
    ///
    /// # Errors
    /// [`EncodeError::Attribute`] when any of the five required attributes is
    /// missing or empty; no buffer is produced in that case.
    #[instrument(
        name = "columnar_encode",
        skip(self, message),
        fields(message_id = %message.id, compression = ?self.compression)
    )]
    pub fn encode(&self, message: &InboundMessage) -> Result<EncodedObject, EncodeError> {
        let record = ColumnarRecord::from_message(message)?;
        self.encode_record(&record)
    }

    /// Encode an already-built record
    pub fn encode_record(&self, record: &ColumnarRecord) -> Result<EncodedObject, EncodeError> {
        let schema = record_schema();
        let batch = record_to_batch(record)?;

        let props = WriterProperties::builder()
            .set_compression(codec(self.compression))
            .build();

        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        let size = buffer.len();
        debug!(size, "Columnar record encoded");

        Ok(EncodedObject {
            buffer: Bytes::from(buffer),
            size,
        })
    }
}

/// Build a single-row record batch in schema column order
fn record_to_batch(record: &ColumnarRecord) -> Result<RecordBatch, EncodeError> {
    let values = [
        &record.time,
        &record.tracking_id,
        &record.message_id,
        &record.level,
        &record.application,
        &record.version,
        &record.message,
    ];

    let columns: Vec<ArrayRef> = values
        .into_iter()
        .map(|value| Arc::new(StringArray::from(vec![value.as_str()])) as ArrayRef)
        .collect();

    Ok(RecordBatch::try_new(record_schema(), columns)?)
}
