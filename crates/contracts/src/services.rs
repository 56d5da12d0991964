//! Collaborator traits - lookup table, queue system, object store
//!
//! The router only talks to the outside world through these. Implementations
//! live in the `clients` crate (in-memory and AWS).

use bytes::Bytes;
use std::collections::HashMap;

use crate::{ApplicationRecord, ContractError, LookupKey};

/// Destination lookup table
#[trait_variant::make(LookupTable: Send)]
pub trait LocalLookupTable {
    /// Table name (used for logging/errors)
    fn table_name(&self) -> &str;

    /// Fetch the record for `key`
    ///
    /// `Ok(None)` means no record exists.
    ///
    /// # Errors
    /// Transport failures and records that cannot be decoded
    async fn get(&self, key: &LookupKey) -> Result<Option<ApplicationRecord>, ContractError>;
}

/// Queue system: address resolution, send, acknowledge
#[trait_variant::make(QueueClient: Send)]
pub trait LocalQueueClient {
    /// Resolve a logical queue name to its address
    ///
    /// `Ok(None)` means the name resolved to nothing.
    async fn resolve_address(&self, name: &str) -> Result<Option<String>, ContractError>;

    /// Send a body with string attributes to a resolved address
    async fn send(
        &self,
        address: &str,
        body: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<(), ContractError>;

    /// Remove a message from the queue at `address`
    async fn delete(&self, address: &str, deletion_token: &str) -> Result<(), ContractError>;
}

/// Object store accepting whole-object writes
#[trait_variant::make(ObjectStore: Send)]
pub trait LocalObjectStore {
    /// Write `body` as a single object
    async fn put(
        &self,
        region: &str,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<(), ContractError>;
}
