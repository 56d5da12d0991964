//! # Dispatcher
//!
//! Delivery of one message to its resolved sink.
//!
//! Responsibilities:
//! - Forward a message unchanged (body + attributes) to a named queue
//! - Encode a message to a columnar object and write it under a
//!   date-partitioned key in the object store
//! - Report a typed failure; never retry

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod partition;
pub mod sinks;

pub use dispatcher::{Delivery, Dispatcher};
pub use error::DeliveryError;
pub use metrics::{DeliveryMetrics, MetricsSnapshot};
pub use partition::object_key;
pub use sinks::{ObjectStoreSink, QueueSink, StoredObject};
