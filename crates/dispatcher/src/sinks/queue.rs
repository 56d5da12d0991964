//! QueueSink - forwards a message unchanged to a named queue

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{InboundMessage, QueueClient};
use tracing::{debug, instrument};

use crate::error::DeliveryError;

/// Sink that resolves a queue by name and re-sends the message to it
pub struct QueueSink<Q> {
    queues: Arc<Q>,
}

impl<Q> QueueSink<Q>
where
    Q: QueueClient + Sync,
{
    pub fn new(queues: Arc<Q>) -> Self {
        Self { queues }
    }

    /// Forward body and full attribute map to `sink_name`
    ///
    /// A message without attributes is forwarded with an empty map.
    /// Returns the address the message was sent to.
    #[instrument(
        name = "queue_sink_forward",
        skip(self, message),
        fields(sink = %sink_name, message_id = %message.id)
    )]
    pub async fn forward(
        &self,
        sink_name: &str,
        message: &InboundMessage,
    ) -> Result<String, DeliveryError> {
        let address = self
            .queues
            .resolve_address(sink_name)
            .await
            .map_err(|e| DeliveryError::delivery_failed(sink_name, e))?
            .filter(|a| !a.is_empty())
            .ok_or_else(|| DeliveryError::queue_address_not_found(sink_name))?;

        debug!(address = %address, "Resolved sink queue address");

        let empty = HashMap::new();
        let attributes = message.attributes.as_ref().unwrap_or(&empty);

        self.queues
            .send(&address, &message.body, attributes)
            .await
            .map_err(|e| DeliveryError::delivery_failed(sink_name, e))?;

        Ok(address)
    }
}
