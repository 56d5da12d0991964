//! Sink implementations
//!
//! Contains QueueSink (forward unchanged) and ObjectStoreSink (columnar write).

mod object_store;
mod queue;

pub use self::object_store::{ObjectStoreSink, StoredObject};
pub use self::queue::QueueSink;
