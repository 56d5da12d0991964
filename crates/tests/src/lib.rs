//! # Integration Tests
//!
//! Cross-crate end-to-end scenarios, all against in-memory collaborators:
//! event decoding -> resolution -> delivery -> deletion.

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use clients::{MemoryFailures, MemoryLookupTable, MemoryObjectStore, MemoryQueues};
    use config_loader::{ConfigLoader, ENV_LOG_LEVEL, ENV_S3_BUCKET, ENV_S3_PATH, ENV_S3_REGION};
    use contracts::{ApplicationRecord, InboundBatch, InboundMessage, RouterConfig};
    use dispatcher::MetricsSnapshot;
    use router::{BatchRouter, MessageOutcome};

    type Router = BatchRouter<MemoryLookupTable, MemoryQueues, MemoryObjectStore>;

    const INBOUND: &str = "https://sqs/logging_queue.fifo";
    const PROC_A: &str = "https://sqs/procA";

    struct Harness {
        table: Arc<MemoryLookupTable>,
        queues: Arc<MemoryQueues>,
        store: Arc<MemoryObjectStore>,
        router: Router,
    }

    fn config() -> RouterConfig {
        let env: HashMap<&str, &str> = [
            (ENV_S3_BUCKET, "log-archive"),
            (ENV_S3_PATH, "logs/raw"),
            (ENV_S3_REGION, "ap-southeast-2"),
            (ENV_LOG_LEVEL, "DEBUG"),
        ]
        .into_iter()
        .collect();
        ConfigLoader::from_lookup(|name| env.get(name).map(|v| v.to_string())).unwrap()
    }

    fn harness(failures: MemoryFailures) -> Harness {
        let table = Arc::new(
            MemoryLookupTable::new("application")
                .with_record(ApplicationRecord::new("fred", "1", "procA"))
                .with_record(ApplicationRecord::new("fred", "2", ""))
                .with_record(ApplicationRecord::new("bob", "1", "ghost")),
        );
        let queues = Arc::new(
            MemoryQueues::with_failures(failures)
                .with_queue("logging_queue.fifo", INBOUND)
                .with_queue("procA", PROC_A),
        );
        let store = Arc::new(MemoryObjectStore::new());
        let router =
            BatchRouter::new(&config(), table.clone(), queues.clone(), store.clone()).unwrap();
        Harness {
            table,
            queues,
            store,
            router,
        }
    }

    fn routed(id: &str, app: &str, version: &str) -> InboundMessage {
        InboundMessage::new(id, format!("rh-{id}"), format!("body of {id}"))
            .with_attribute("APPLICATION_NAME", app)
            .with_attribute("APPLICATION_VERS", version)
    }

    fn archivable(id: &str, app: &str, version: &str) -> InboundMessage {
        routed(id, app, version)
            .with_attribute("LOG_LEVEL", "ERROR")
            .with_attribute("TIMESTAMP", "2024-03-07T10:00:00Z")
            .with_attribute("TRACKING_ID", format!("trk-{id}"))
    }

    /// fred/1 -> procA; delivered, then deleted via the inbound queue address
    #[tokio::test]
    async fn test_routed_message_forwarded_and_deleted() {
        let h = harness(MemoryFailures::default());
        let msg = routed("m-1", "fred", "1").with_attribute("EXTRA", "kept");

        let report = h.router.process_batch(&vec![msg].into()).await;

        assert_eq!(report.deleted(), 1);
        let sent = h.queues.sent_to(PROC_A);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "body of m-1");
        assert_eq!(sent[0].attributes.get("EXTRA").map(String::as_str), Some("kept"));

        let deleted = h.queues.deleted();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].address, INBOUND);
        assert_eq!(deleted[0].deletion_token, "rh-m-1");
        assert!(h.store.is_empty());
    }

    /// No attributes: lookup never consulted, default sink, encode fails, retained
    #[tokio::test]
    async fn test_unattributed_message_retained() {
        let h = harness(MemoryFailures::default());
        let msg = InboundMessage::new("m-2", "rh-m-2", "orphan");

        let report = h.router.process_batch(&vec![msg].into()).await;

        let line = report.get("m-2").unwrap();
        assert_eq!(line.sink, "object_store");
        assert!(matches!(line.outcome, MessageOutcome::DeliveryFailed { .. }));
        assert_eq!(h.table.lookup_count(), 0);
        assert!(h.queues.deleted().is_empty());
        assert!(h.queues.sent().is_empty());
        assert!(h.store.is_empty());
    }

    /// Empty sink name: default sink even with valid attributes; object decodes back
    #[tokio::test]
    async fn test_empty_sink_name_archives_record() {
        let h = harness(MemoryFailures::default());
        let msg = archivable("m-3", "fred", "2");

        let report = h.router.process_batch(&vec![msg].into()).await;

        let line = report.get("m-3").unwrap();
        assert_eq!(line.sink, "object_store");
        assert_eq!(line.fallback, Some("empty_sink_name"));
        assert_eq!(line.outcome, MessageOutcome::Deleted);

        let objects = h.store.objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].bucket, "log-archive");
        assert_eq!(objects[0].region, "ap-southeast-2");
        assert!(objects[0].key.starts_with("logs/raw/year="));
        assert!(objects[0].key.ends_with("/m-3.parquet"));

        let records = columnar::decode(objects[0].body.clone()).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.message_id, "m-3");
        assert_eq!(record.message, "body of m-3");
        assert_eq!(record.application, "fred");
        assert_eq!(record.version, "2");
        assert_eq!(record.level, "ERROR");
        assert_eq!(record.time, "2024-03-07T10:00:00Z");
        assert_eq!(record.tracking_id, "trk-m-3");
    }

    /// Message 2 fails delivery; 1 and 3 are still delivered and deleted
    #[tokio::test]
    async fn test_partial_failure_does_not_abort_batch() {
        let h = harness(MemoryFailures::default());
        let batch: InboundBatch = vec![
            routed("m-1", "fred", "1"),
            routed("m-2", "bob", "1"),
            archivable("m-3", "unknown", "9"),
        ]
        .into();

        let report = h.router.process_batch(&batch).await;

        assert_eq!(report.len(), 3);
        assert_eq!(report.get("m-1").unwrap().outcome, MessageOutcome::Deleted);
        assert!(matches!(
            report.get("m-2").unwrap().outcome,
            MessageOutcome::DeliveryFailed { ref error } if error.contains("ghost")
        ));
        assert_eq!(report.get("m-3").unwrap().outcome, MessageOutcome::Deleted);

        let tokens = h.queues.deleted_tokens();
        assert!(tokens.contains("rh-m-1"));
        assert!(!tokens.contains("rh-m-2"));
        assert!(tokens.contains("rh-m-3"));
        assert_eq!(h.store.len(), 1);

        let object_bytes = h.store.objects()[0].body.len() as u64;
        assert_eq!(
            h.router.delivery_metrics(),
            MetricsSnapshot {
                queue_deliveries: 1,
                object_writes: 1,
                bytes_written: object_bytes,
                failures: 1,
            }
        );
    }

    /// Deleted iff delivered, including when the send itself fails
    #[tokio::test]
    async fn test_deleted_iff_delivered() {
        let h = harness(MemoryFailures {
            fail_send: vec![PROC_A.into()],
            ..Default::default()
        });
        let batch: InboundBatch = vec![
            routed("m-1", "fred", "1"),
            archivable("m-2", "fred", "2"),
            InboundMessage::new("m-3", "rh-m-3", "orphan"),
        ]
        .into();

        let report = h.router.process_batch(&batch).await;
        let tokens = h.queues.deleted_tokens();

        for line in &report.messages {
            let token = format!("rh-{}", line.message_id);
            assert_eq!(
                line.outcome.is_delivered(),
                tokens.contains(&token),
                "message {}",
                line.message_id
            );
        }
        assert_eq!(report.delivered(), 1);
    }

    /// Lookup unreachable: every message goes to the default sink
    #[tokio::test]
    async fn test_lookup_outage_degrades_to_default_sink() {
        let table = Arc::new(MemoryLookupTable::with_failures(
            "application",
            MemoryFailures {
                fail_lookups: true,
                ..Default::default()
            },
        ));
        let queues = Arc::new(MemoryQueues::new().with_queue("logging_queue.fifo", INBOUND));
        let store = Arc::new(MemoryObjectStore::new());
        let router = BatchRouter::new(&config(), table, queues.clone(), store.clone()).unwrap();

        let report = router
            .process_batch(&vec![archivable("m-1", "fred", "1")].into())
            .await;

        let line = report.get("m-1").unwrap();
        assert_eq!(line.sink, "object_store");
        assert_eq!(line.fallback, Some("lookup_failed"));
        assert_eq!(line.outcome, MessageOutcome::Deleted);
        assert_eq!(store.len(), 1);
    }

    /// Empty batch: success with zero side effects
    #[tokio::test]
    async fn test_empty_batch() {
        let h = harness(MemoryFailures::default());

        let report = h.router.process_batch(&InboundBatch::default()).await;

        assert!(report.is_empty());
        assert_eq!(h.table.lookup_count(), 0);
        assert_eq!(h.queues.resolve_count(), 0);
        assert!(h.store.is_empty());
    }

    /// Queue event JSON through the whole router
    #[tokio::test]
    async fn test_event_json_batch() {
        let h = harness(MemoryFailures::default());
        let event = r#"{
            "Records": [
                {
                    "messageId": "12345",
                    "receiptHandle": "Fred12345",
                    "body": "blah blah blah",
                    "messageAttributes": {
                        "APPLICATION_NAME": {"stringValue": "fred", "dataType": "String"},
                        "APPLICATION_VERS": {"stringValue": "1", "dataType": "String"}
                    }
                }
            ]
        }"#;

        let batch = InboundBatch::from_event_json(event).unwrap();
        let report = h.router.process_batch(&batch).await;

        assert_eq!(report.deleted(), 1);
        assert_eq!(h.queues.sent_to(PROC_A)[0].body, "blah blah blah");
        assert!(h.queues.deleted_tokens().contains("Fred12345"));
    }
}
