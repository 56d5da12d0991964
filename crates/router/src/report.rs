//! Per-batch report

use std::time::Duration;

use serde::Serialize;

/// What happened to one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MessageOutcome {
    /// Delivered and removed from the inbound queue
    Deleted,
    /// Not delivered; left on the inbound queue for redelivery
    DeliveryFailed { error: String },
    /// Delivered, but still on the inbound queue (may be redelivered)
    DeleteFailed { error: String },
}

impl MessageOutcome {
    pub fn is_delivered(&self) -> bool {
        !matches!(self, Self::DeliveryFailed { .. })
    }
}

/// One message's line in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageReport {
    pub message_id: String,
    /// Display form of the resolved sink
    pub sink: String,
    /// Fallback reason label when resolution degraded to the default sink
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<&'static str>,
    #[serde(flatten)]
    pub outcome: MessageOutcome,
}

/// Outcome of one batch, in arrival order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub messages: Vec<MessageReport>,
    /// Wall time spent on the batch
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages whose delivery succeeded (deleted or not)
    pub fn delivered(&self) -> usize {
        self.count(|m| m.outcome.is_delivered())
    }

    pub fn deleted(&self) -> usize {
        self.count(|m| m.outcome == MessageOutcome::Deleted)
    }

    pub fn delivery_failures(&self) -> usize {
        self.count(|m| matches!(m.outcome, MessageOutcome::DeliveryFailed { .. }))
    }

    pub fn delete_failures(&self) -> usize {
        self.count(|m| matches!(m.outcome, MessageOutcome::DeleteFailed { .. }))
    }

    pub fn fallbacks(&self) -> usize {
        self.count(|m| m.fallback.is_some())
    }

    /// Report line for a message id
    pub fn get(&self, message_id: &str) -> Option<&MessageReport> {
        self.messages.iter().find(|m| m.message_id == message_id)
    }

    fn count(&self, predicate: impl Fn(&MessageReport) -> bool) -> usize {
        self.messages.iter().filter(|m| predicate(m)).count()
    }

    /// Print a short human-readable summary
    pub fn print_summary(&self) {
        println!("\nBatch summary");
        println!("   ├─ Duration: {:.3}s", self.duration.as_secs_f64());
        println!("   ├─ Messages: {}", self.len());
        println!("   ├─ Delivered: {}", self.delivered());
        println!("   ├─ Deleted: {}", self.deleted());
        println!("   ├─ Delivery failures: {}", self.delivery_failures());
        println!("   ├─ Delete failures: {}", self.delete_failures());
        println!("   └─ Default-sink fallbacks: {}", self.fallbacks());

        let failed: Vec<_> = self
            .messages
            .iter()
            .filter(|m| m.outcome != MessageOutcome::Deleted)
            .collect();
        if !failed.is_empty() {
            println!("\nRetained or undeleted messages");
            for m in failed {
                match &m.outcome {
                    MessageOutcome::DeliveryFailed { error } => {
                        println!("   ├─ {} [{}] delivery failed: {}", m.message_id, m.sink, error)
                    }
                    MessageOutcome::DeleteFailed { error } => {
                        println!("   ├─ {} [{}] delete failed: {}", m.message_id, m.sink, error)
                    }
                    MessageOutcome::Deleted => {}
                }
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, fallback: Option<&'static str>, outcome: MessageOutcome) -> MessageReport {
        MessageReport {
            message_id: id.to_string(),
            sink: "object_store".to_string(),
            fallback,
            outcome,
        }
    }

    #[test]
    fn test_counts() {
        let report = BatchReport {
            messages: vec![
                line("1", None, MessageOutcome::Deleted),
                line(
                    "2",
                    Some("attribute"),
                    MessageOutcome::DeliveryFailed {
                        error: "boom".into(),
                    },
                ),
                line(
                    "3",
                    None,
                    MessageOutcome::DeleteFailed {
                        error: "gone".into(),
                    },
                ),
            ],
            duration: Duration::from_millis(12),
        };

        assert_eq!(report.len(), 3);
        assert_eq!(report.delivered(), 2);
        assert_eq!(report.deleted(), 1);
        assert_eq!(report.delivery_failures(), 1);
        assert_eq!(report.delete_failures(), 1);
        assert_eq!(report.fallbacks(), 1);
        assert!(report.get("2").is_some());
    }

    #[test]
    fn test_serializes_flat_status() {
        let report = BatchReport {
            messages: vec![line(
                "2",
                Some("not_found"),
                MessageOutcome::DeliveryFailed {
                    error: "boom".into(),
                },
            )],
            duration: Duration::from_millis(1500),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["duration_ms"], 1500);
        assert_eq!(json["messages"][0]["status"], "delivery_failed");
        assert_eq!(json["messages"][0]["error"], "boom");
        assert_eq!(json["messages"][0]["fallback"], "not_found");
    }
}
