//! Destination resolution
//!
//! Fails open: every problem degrades to the default object-store sink so a
//! message always has somewhere to go.

use std::fmt;
use std::sync::Arc;

use contracts::{AttributeError, InboundMessage, LookupKey, LookupTable, ResolvedSink};
use tracing::{debug, instrument, warn};

/// Why resolution fell back to the default sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Application name or version could not be read
    Attribute(AttributeError),
    /// Lookup transport or decode failure
    LookupFailed(String),
    /// No record for the key
    NotFound,
    /// Record exists but its sink name is empty
    EmptySinkName,
}

impl FallbackReason {
    /// Short label for logs and metrics
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attribute(_) => "attribute",
            Self::LookupFailed(_) => "lookup_failed",
            Self::NotFound => "not_found",
            Self::EmptySinkName => "empty_sink_name",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(e) => write!(f, "{e}"),
            Self::LookupFailed(message) => write!(f, "lookup failed: {message}"),
            Self::NotFound => f.write_str("no lookup record"),
            Self::EmptySinkName => f.write_str("lookup record has empty sink name"),
        }
    }
}

/// A resolved sink plus, when it was a fallback, the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub sink: ResolvedSink,
    pub fallback: Option<FallbackReason>,
}

impl Resolution {
    fn routed(sink: ResolvedSink) -> Self {
        Self {
            sink,
            fallback: None,
        }
    }

    fn fallback(reason: FallbackReason) -> Self {
        Self {
            sink: ResolvedSink::ObjectStore,
            fallback: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Resolves each message to a sink via the application lookup table
pub struct DestinationResolver<L> {
    table: Arc<L>,
    default_sink_name: String,
}

impl<L> DestinationResolver<L>
where
    L: LookupTable + Sync,
{
    pub fn new(table: Arc<L>, default_sink_name: impl Into<String>) -> Self {
        Self {
            table,
            default_sink_name: default_sink_name.into(),
        }
    }

    /// Sink for `message`; never fails
    pub async fn resolve(&self, message: &InboundMessage) -> ResolvedSink {
        self.resolve_with_reason(message).await.sink
    }

    /// Like [`resolve`](Self::resolve) but keeps the fallback reason
    ///
    /// The table is only queried when both key parts are present and non-empty.
    #[instrument(
        name = "resolver_resolve",
        skip(self, message),
        fields(message_id = %message.id, table = %self.table.table_name())
    )]
    pub async fn resolve_with_reason(&self, message: &InboundMessage) -> Resolution {
        let key = match LookupKey::from_message(message) {
            Ok(key) => key,
            Err(e) => return self.fall_back(FallbackReason::Attribute(e)),
        };

        let record = match self.table.get(&key).await {
            Ok(Some(record)) => record,
            Ok(None) => return self.fall_back(FallbackReason::NotFound),
            Err(e) => return self.fall_back(FallbackReason::LookupFailed(e.to_string())),
        };

        match ResolvedSink::from_sink_name(&record.sink_name, &self.default_sink_name) {
            Some(sink) => {
                debug!(key = %key, sink = %sink, "Destination resolved");
                Resolution::routed(sink)
            }
            None => self.fall_back(FallbackReason::EmptySinkName),
        }
    }

    fn fall_back(&self, reason: FallbackReason) -> Resolution {
        warn!(
            reason = reason.as_str(),
            detail = %reason,
            sink = %self.default_sink_name,
            "Falling back to default sink"
        );
        observability::record_resolution_fallback(reason.as_str());
        Resolution::fallback(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clients::{MemoryFailures, MemoryLookupTable};
    use contracts::ApplicationRecord;

    fn resolver(table: MemoryLookupTable) -> (Arc<MemoryLookupTable>, DestinationResolver<MemoryLookupTable>) {
        let table = Arc::new(table);
        (table.clone(), DestinationResolver::new(table, "S3QUEUE"))
    }

    fn routed_table() -> MemoryLookupTable {
        MemoryLookupTable::new("application")
            .with_record(ApplicationRecord::new("fred", "1", "procA"))
            .with_record(ApplicationRecord::new("fred", "2", ""))
            .with_record(ApplicationRecord::new("fred", "3", "S3QUEUE"))
    }

    fn message(app: &str, version: &str) -> InboundMessage {
        InboundMessage::new("m-1", "rh-1", "body")
            .with_attribute("APPLICATION_NAME", app)
            .with_attribute("APPLICATION_VERS", version)
    }

    #[tokio::test]
    async fn test_resolves_configured_queue() {
        let (_, resolver) = resolver(routed_table());
        let resolution = resolver.resolve_with_reason(&message("fred", "1")).await;
        assert_eq!(resolution.sink, ResolvedSink::Queue("procA".into()));
        assert!(!resolution.is_fallback());
    }

    #[tokio::test]
    async fn test_missing_attributes_skip_lookup() {
        let (table, resolver) = resolver(routed_table());

        let bare = InboundMessage::new("m", "r", "b");
        let resolution = resolver.resolve_with_reason(&bare).await;
        assert_eq!(resolution.sink, ResolvedSink::ObjectStore);
        assert_eq!(
            resolution.fallback,
            Some(FallbackReason::Attribute(AttributeError::Missing))
        );

        let empty_version = message("fred", "");
        assert_eq!(resolver.resolve(&empty_version).await, ResolvedSink::ObjectStore);

        let no_version = InboundMessage::new("m", "r", "b").with_attribute("APPLICATION_NAME", "fred");
        assert_eq!(resolver.resolve(&no_version).await, ResolvedSink::ObjectStore);

        assert_eq!(table.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_key_falls_back() {
        let (table, resolver) = resolver(routed_table());
        let resolution = resolver.resolve_with_reason(&message("bob", "1")).await;
        assert_eq!(resolution.sink, ResolvedSink::ObjectStore);
        assert_eq!(resolution.fallback, Some(FallbackReason::NotFound));
        assert_eq!(table.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_sink_name_falls_back() {
        let (_, resolver) = resolver(routed_table());
        let resolution = resolver.resolve_with_reason(&message("fred", "2")).await;
        assert_eq!(resolution.sink, ResolvedSink::ObjectStore);
        assert_eq!(resolution.fallback, Some(FallbackReason::EmptySinkName));
    }

    #[tokio::test]
    async fn test_default_sink_name_is_object_store() {
        let (_, resolver) = resolver(routed_table());
        let resolution = resolver.resolve_with_reason(&message("fred", "3")).await;
        assert_eq!(resolution.sink, ResolvedSink::ObjectStore);
        assert!(!resolution.is_fallback());
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back() {
        let (_, resolver) = resolver(MemoryLookupTable::with_failures(
            "application",
            MemoryFailures {
                fail_lookups: true,
                ..Default::default()
            },
        ));
        let resolution = resolver.resolve_with_reason(&message("fred", "1")).await;
        assert_eq!(resolution.sink, ResolvedSink::ObjectStore);
        assert_eq!(
            resolution.fallback.as_ref().map(FallbackReason::as_str),
            Some("lookup_failed")
        );
    }
}
