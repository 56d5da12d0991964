//! # Clients
//!
//! Implementations of the router's collaborator traits.
//!
//! - [`memory`]: in-memory lookup table, queues and object store with
//!   call recording and failure injection
//! - [`fs`]: object store writing into a local directory
//! - `aws` (feature `aws`): DynamoDB, SQS and S3

#[cfg(feature = "aws")]
pub mod aws;
pub mod fs;
pub mod memory;

pub use fs::DirectoryObjectStore;
pub use memory::{
    DeletedMessage, MemoryFailures, MemoryLookupTable, MemoryObjectStore, MemoryQueues,
    SentMessage, StoredObject,
};
