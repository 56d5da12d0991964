//! Dispatcher - routes one message to its resolved sink

use std::sync::Arc;

use contracts::{InboundMessage, ObjectStore, ObjectStoreConfig, QueueClient, ResolvedSink};
use tracing::{debug, instrument};

use crate::error::DeliveryError;
use crate::metrics::{DeliveryMetrics, MetricsSnapshot};
use crate::sinks::{ObjectStoreSink, QueueSink, StoredObject};

/// Outcome of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Forwarded to the queue at `address`
    Queue { sink: String, address: String },
    /// Written as a columnar object
    Object(StoredObject),
}

impl Delivery {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Queue { .. } => "queue",
            Self::Object(_) => "object_store",
        }
    }
}

/// Delivers messages to a queue sink or the object store
///
/// Stateless between messages apart from counters; one delivery attempt per call.
pub struct Dispatcher<Q, S> {
    queue_sink: QueueSink<Q>,
    object_sink: ObjectStoreSink<S>,
    metrics: DeliveryMetrics,
}

impl<Q, S> Dispatcher<Q, S>
where
    Q: QueueClient + Sync,
    S: ObjectStore + Sync,
{
    pub fn new(queues: Arc<Q>, store: Arc<S>, object_store: ObjectStoreConfig) -> Self {
        Self::with_sinks(
            QueueSink::new(queues),
            ObjectStoreSink::new(store, object_store),
        )
    }

    /// Create a dispatcher from prepared sinks (for testing)
    pub fn with_sinks(queue_sink: QueueSink<Q>, object_sink: ObjectStoreSink<S>) -> Self {
        Self {
            queue_sink,
            object_sink,
            metrics: DeliveryMetrics::new(),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Deliver to whichever sink was resolved
    #[instrument(
        name = "dispatcher_deliver",
        skip(self, message),
        fields(message_id = %message.id, sink = %sink)
    )]
    pub async fn deliver(
        &self,
        sink: &ResolvedSink,
        message: &InboundMessage,
    ) -> Result<Delivery, DeliveryError> {
        let result = match sink {
            ResolvedSink::Queue(name) => self.deliver_to_queue(name, message).await,
            ResolvedSink::ObjectStore => self
                .deliver_to_object_store(message)
                .await
                .map(Delivery::Object),
        };

        if let Err(e) = &result {
            self.metrics.inc_failures();
            debug!(error = %e, kind = e.kind(), "Delivery failed");
        }
        result
    }

    /// Forward body and attributes unchanged to the named queue
    pub async fn deliver_to_queue(
        &self,
        sink_name: &str,
        message: &InboundMessage,
    ) -> Result<Delivery, DeliveryError> {
        let address = self.queue_sink.forward(sink_name, message).await?;
        self.metrics.inc_queue_deliveries();
        Ok(Delivery::Queue {
            sink: sink_name.to_string(),
            address,
        })
    }

    /// Encode to one columnar object and write it under a date-partitioned key
    pub async fn deliver_to_object_store(
        &self,
        message: &InboundMessage,
    ) -> Result<StoredObject, DeliveryError> {
        let stored = self.object_sink.persist(message).await?;
        self.metrics.record_object_write(stored.size);
        Ok(stored)
    }
}
