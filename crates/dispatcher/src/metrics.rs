//! Delivery metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatcher
#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    /// Messages forwarded to a queue sink
    queue_deliveries: AtomicU64,
    /// Columnar objects written
    object_writes: AtomicU64,
    /// Total bytes written to the object store
    bytes_written: AtomicU64,
    /// Deliveries that failed for any reason
    failures: AtomicU64,
}

impl DeliveryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_deliveries(&self) -> u64 {
        self.queue_deliveries.load(Ordering::Relaxed)
    }

    pub fn inc_queue_deliveries(&self) {
        self.queue_deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn object_writes(&self) -> u64 {
        self.object_writes.load(Ordering::Relaxed)
    }

    /// Record one object write of `bytes` bytes
    pub fn record_object_write(&self, bytes: usize) {
        self.object_writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn inc_failures(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_deliveries: self.queue_deliveries(),
            object_writes: self.object_writes(),
            bytes_written: self.bytes_written(),
            failures: self.failures(),
        }
    }
}

/// Snapshot of delivery metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queue_deliveries: u64,
    pub object_writes: u64,
    pub bytes_written: u64,
    pub failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tracks_counters() {
        let metrics = DeliveryMetrics::new();
        metrics.inc_queue_deliveries();
        metrics.record_object_write(120);
        metrics.record_object_write(80);
        metrics.inc_failures();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                queue_deliveries: 1,
                object_writes: 2,
                bytes_written: 200,
                failures: 1,
            }
        );
    }
}
