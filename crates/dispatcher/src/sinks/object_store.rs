//! ObjectStoreSink - writes a message as one columnar object

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use columnar::ColumnarEncoder;
use contracts::{InboundMessage, ObjectStore, ObjectStoreConfig};
use tracing::{debug, instrument};

use crate::error::DeliveryError;
use crate::partition::object_key;

/// Where an object ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub size: usize,
}

/// Sink that encodes a message to a columnar buffer and uploads it
pub struct ObjectStoreSink<S> {
    store: Arc<S>,
    config: ObjectStoreConfig,
    encoder: ColumnarEncoder,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl<S> ObjectStoreSink<S>
where
    S: ObjectStore + Sync,
{
    pub fn new(store: Arc<S>, config: ObjectStoreConfig) -> Self {
        let encoder = ColumnarEncoder::new(config.compression);
        Self {
            store,
            config,
            encoder,
            today: utc_today,
        }
    }

    /// Override the partition date source (UTC today by default)
    pub fn with_date_source(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Encode and write one message
    ///
    /// Encoding fails closed: any missing columnar attribute aborts before
    /// anything is written.
    #[instrument(
        name = "object_store_sink_persist",
        skip(self, message),
        fields(message_id = %message.id, bucket = %self.config.bucket)
    )]
    pub async fn persist(&self, message: &InboundMessage) -> Result<StoredObject, DeliveryError> {
        let encoded = self.encoder.encode(message)?;
        let key = object_key(&self.config.path_prefix, (self.today)(), &message.id);

        self.store
            .put(
                &self.config.region,
                &self.config.bucket,
                &key,
                encoded.buffer,
            )
            .await
            .map_err(|e| DeliveryError::storage_write_failed(&key, e))?;

        debug!(key = %key, bytes = encoded.size, "Columnar object written");

        Ok(StoredObject {
            bucket: self.config.bucket.clone(),
            key,
            size: encoded.size,
        })
    }
}
