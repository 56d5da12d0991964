//! Batch orchestrator
//!
//! Per message: resolve, deliver, then delete from the inbound queue.
//! Messages are handled strictly in order, one at a time. A message is
//! deleted only after its delivery succeeded; no per-message failure stops
//! the batch.

use std::sync::Arc;
use std::time::Instant;

use config_loader::ConfigLoader;
use contracts::{
    InboundBatch, InboundMessage, LookupTable, ObjectStore, QueueClient, RouterConfig,
};
use dispatcher::{Delivery, Dispatcher, MetricsSnapshot};
use tracing::{debug, info, instrument, warn};

use crate::error::RouterError;
use crate::report::{BatchReport, MessageOutcome, MessageReport};
use crate::resolver::DestinationResolver;

/// Entry point invoked once per inbound batch
pub struct BatchRouter<L, Q, S> {
    resolver: DestinationResolver<L>,
    dispatcher: Dispatcher<Q, S>,
    queues: Arc<Q>,
    inbound_queue_name: String,
}

impl<L, Q, S> BatchRouter<L, Q, S>
where
    L: LookupTable + Sync,
    Q: QueueClient + Sync,
    S: ObjectStore + Sync,
{
    /// Build a router; the configuration is validated first
    ///
    /// # Errors
    /// `RouterError::InvalidConfig` when a required setting is missing or invalid
    pub fn new(
        config: &RouterConfig,
        table: Arc<L>,
        queues: Arc<Q>,
        store: Arc<S>,
    ) -> Result<Self, RouterError> {
        ConfigLoader::validate(config).map_err(RouterError::InvalidConfig)?;

        Ok(Self {
            resolver: DestinationResolver::new(table, config.default_sink_name.clone()),
            dispatcher: Dispatcher::new(queues.clone(), store, config.object_store.clone()),
            queues,
            inbound_queue_name: config.inbound_queue_name.clone(),
        })
    }

    /// Delivery counters accumulated across batches
    pub fn delivery_metrics(&self) -> MetricsSnapshot {
        self.dispatcher.metrics()
    }

    /// Route every message of the batch
    ///
    /// Never fails: per-message outcomes are in the returned report.
    /// An empty batch returns immediately without touching any collaborator.
    #[instrument(name = "router_process_batch", skip(self, batch), fields(messages = batch.len()))]
    pub async fn process_batch(&self, batch: &InboundBatch) -> BatchReport {
        if batch.is_empty() {
            debug!("Empty batch, nothing to do");
            return BatchReport::default();
        }

        let start = Instant::now();
        observability::record_batch(batch.len());

        let mut messages = Vec::with_capacity(batch.len());
        for message in batch {
            messages.push(self.process_message(message).await);
        }

        let report = BatchReport {
            messages,
            duration: start.elapsed(),
        };

        info!(
            messages = report.len(),
            deleted = report.deleted(),
            delivery_failures = report.delivery_failures(),
            delete_failures = report.delete_failures(),
            fallbacks = report.fallbacks(),
            elapsed_ms = report.duration.as_millis() as u64,
            "Batch processed"
        );
        report
    }

    #[instrument(name = "router_process_message", skip(self, message), fields(message_id = %message.id))]
    async fn process_message(&self, message: &InboundMessage) -> MessageReport {
        let resolution = self.resolver.resolve_with_reason(message).await;
        let sink_kind = resolution.sink.kind();

        let outcome = match self.dispatcher.deliver(&resolution.sink, message).await {
            Ok(delivery) => {
                observability::record_delivery(sink_kind, true);
                if let Delivery::Object(stored) = &delivery {
                    observability::record_object_bytes(stored.size);
                }
                debug!(sink = %resolution.sink, "Message delivered");
                self.acknowledge(message).await
            }
            Err(e) => {
                observability::record_delivery(sink_kind, false);
                warn!(
                    sink = %resolution.sink,
                    error = %e,
                    "Delivery failed, message left on inbound queue"
                );
                MessageOutcome::DeliveryFailed {
                    error: e.to_string(),
                }
            }
        };

        MessageReport {
            message_id: message.id.clone(),
            sink: resolution.sink.to_string(),
            fallback: resolution.fallback.as_ref().map(|r| r.as_str()),
            outcome,
        }
    }

    /// Delete after a successful delivery; failure only downgrades the outcome
    async fn acknowledge(&self, message: &InboundMessage) -> MessageOutcome {
        match self.delete_from_inbound(message).await {
            Ok(()) => {
                observability::record_delete(true);
                debug!("Message deleted from inbound queue");
                MessageOutcome::Deleted
            }
            Err(e) => {
                observability::record_delete(false);
                warn!(error = %e, "Delivered message could not be deleted");
                MessageOutcome::DeleteFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Resolve the inbound queue address, then delete with the message's token
    async fn delete_from_inbound(&self, message: &InboundMessage) -> Result<(), RouterError> {
        let address = self
            .queues
            .resolve_address(&self.inbound_queue_name)
            .await
            .map_err(|e| RouterError::delete_failed(&message.id, e))?
            .filter(|a| !a.is_empty())
            .ok_or_else(|| RouterError::inbound_queue_not_found(&self.inbound_queue_name))?;

        self.queues
            .delete(&address, &message.deletion_token)
            .await
            .map_err(|e| RouterError::delete_failed(&message.id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clients::{MemoryFailures, MemoryLookupTable, MemoryObjectStore, MemoryQueues};
    use contracts::{ApplicationRecord, ObjectStoreConfig};

    const INBOUND: &str = "memory://logging_queue.fifo";

    fn config() -> RouterConfig {
        RouterConfig::new(
            ObjectStoreConfig::new("log-archive", "logs", "eu-west-1"),
            "INFO",
        )
    }

    fn router_with(
        queues: MemoryQueues,
    ) -> (
        Arc<MemoryQueues>,
        Arc<MemoryObjectStore>,
        BatchRouter<MemoryLookupTable, MemoryQueues, MemoryObjectStore>,
    ) {
        let table = Arc::new(
            MemoryLookupTable::new("application")
                .with_record(ApplicationRecord::new("fred", "1", "procA")),
        );
        let queues = Arc::new(queues.with_queues(["logging_queue.fifo", "procA"]));
        let store = Arc::new(MemoryObjectStore::new());
        let router = BatchRouter::new(&config(), table, queues.clone(), store.clone()).unwrap();
        (queues, store, router)
    }

    fn routed(id: &str) -> InboundMessage {
        InboundMessage::new(id, format!("rh-{id}"), "hello")
            .with_attribute("APPLICATION_NAME", "fred")
            .with_attribute("APPLICATION_VERS", "1")
    }

    #[tokio::test]
    async fn test_delivered_message_is_deleted() {
        let (queues, _store, router) = router_with(MemoryQueues::new());

        let report = router.process_batch(&vec![routed("m-1")].into()).await;

        assert_eq!(report.deleted(), 1);
        assert_eq!(queues.sent_to("memory://procA").len(), 1);
        let deleted = queues.deleted();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].address, INBOUND);
        assert_eq!(deleted[0].deletion_token, "rh-m-1");
    }

    #[tokio::test]
    async fn test_failed_delivery_is_not_deleted() {
        let (queues, store, router) = router_with(MemoryQueues::new());

        let bare = InboundMessage::new("m-2", "rh-m-2", "no attributes");
        let report = router.process_batch(&vec![bare].into()).await;

        let line = report.get("m-2").unwrap();
        assert_eq!(line.sink, "object_store");
        assert_eq!(line.fallback, Some("attribute"));
        assert!(matches!(line.outcome, MessageOutcome::DeliveryFailed { .. }));
        assert!(queues.deleted().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_delivery() {
        let (queues, _store, router) = router_with(MemoryQueues::with_failures(MemoryFailures {
            fail_delete: vec!["rh-m-1".into()],
            ..Default::default()
        }));

        let report = router
            .process_batch(&vec![routed("m-1"), routed("m-2")].into())
            .await;

        assert!(matches!(
            report.get("m-1").unwrap().outcome,
            MessageOutcome::DeleteFailed { .. }
        ));
        assert_eq!(report.get("m-2").unwrap().outcome, MessageOutcome::Deleted);
        assert_eq!(report.delivered(), 2);
        assert_eq!(queues.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_inbound_queue_is_delete_failure() {
        let table = Arc::new(
            MemoryLookupTable::new("application")
                .with_record(ApplicationRecord::new("fred", "1", "procA")),
        );
        let queues = Arc::new(MemoryQueues::new().with_queues(["procA"]));
        let store = Arc::new(MemoryObjectStore::new());
        let router = BatchRouter::new(&config(), table, queues.clone(), store).unwrap();

        let report = router.process_batch(&vec![routed("m-1")].into()).await;
        let MessageOutcome::DeleteFailed { error } = &report.get("m-1").unwrap().outcome else {
            panic!("expected delete failure");
        };
        assert!(error.contains("logging_queue.fifo"));
        assert_eq!(queues.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_has_no_side_effects() {
        let (queues, store, router) = router_with(MemoryQueues::new());

        let report = router.process_batch(&InboundBatch::default()).await;

        assert!(report.is_empty());
        assert_eq!(queues.resolve_count(), 0);
        assert!(queues.sent().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.object_store.bucket.clear();

        let result = BatchRouter::new(
            &bad,
            Arc::new(MemoryLookupTable::new("application")),
            Arc::new(MemoryQueues::new()),
            Arc::new(MemoryObjectStore::new()),
        );
        assert!(matches!(result, Err(RouterError::InvalidConfig(_))));
    }
}
