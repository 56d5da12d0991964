//! In-memory collaborators
//!
//! Used by unit tests, the e2e suite and the CLI's offline `run` mode.
//! Every call is recorded and failures can be injected per operation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use contracts::{
    ApplicationRecord, ContractError, LookupKey, LookupTable, ObjectStore, QueueClient,
};
use tracing::{debug, instrument};

/// Failure injection for the in-memory clients
#[derive(Debug, Default, Clone)]
pub struct MemoryFailures {
    /// Every lookup returns a transport error
    pub fail_lookups: bool,
    /// Queue names whose address resolution errors
    pub fail_resolve: Vec<String>,
    /// Addresses whose sends error
    pub fail_send: Vec<String>,
    /// Deletion tokens whose delete errors
    pub fail_delete: Vec<String>,
    /// Every object put errors
    pub fail_puts: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lookup table backed by a hash map
pub struct MemoryLookupTable {
    table_name: String,
    records: Mutex<HashMap<LookupKey, ApplicationRecord>>,
    failures: MemoryFailures,
    lookups: AtomicU64,
}

impl MemoryLookupTable {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_failures(table_name, MemoryFailures::default())
    }

    pub fn with_failures(table_name: impl Into<String>, failures: MemoryFailures) -> Self {
        Self {
            table_name: table_name.into(),
            records: Mutex::new(HashMap::new()),
            failures,
            lookups: AtomicU64::new(0),
        }
    }

    /// Builder-style insert
    pub fn with_record(self, record: ApplicationRecord) -> Self {
        self.insert(record);
        self
    }

    /// Insert or replace a row; rows with an empty key part are unreachable and ignored
    pub fn insert(&self, record: ApplicationRecord) {
        if let Some(key) = record.key() {
            lock(&self.records).insert(key, record);
        }
    }

    /// Load rows from a JSON array of records
    pub fn from_json(
        table_name: impl Into<String>,
        content: &str,
    ) -> Result<Self, ContractError> {
        let records: Vec<ApplicationRecord> = serde_json::from_str(content)
            .map_err(|e| ContractError::decode(format!("lookup records: {e}")))?;
        let table = Self::new(table_name);
        for record in records {
            table.insert(record);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `get` calls so far
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl LookupTable for MemoryLookupTable {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    #[instrument(name = "memory_lookup_get", skip(self), fields(key = %key))]
    async fn get(&self, key: &LookupKey) -> Result<Option<ApplicationRecord>, ContractError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if self.failures.fail_lookups {
            return Err(ContractError::lookup(&self.table_name, "injected failure"));
        }
        Ok(lock(&self.records).get(key).cloned())
    }
}

/// A message accepted by [`MemoryQueues::send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub address: String,
    pub body: String,
    pub attributes: HashMap<String, String>,
}

/// A successful [`MemoryQueues::delete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedMessage {
    pub address: String,
    pub deletion_token: String,
}

/// Queue system with named queues registered up front
pub struct MemoryQueues {
    addresses: Mutex<HashMap<String, String>>,
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<DeletedMessage>>,
    failures: MemoryFailures,
    resolves: AtomicU64,
}

impl MemoryQueues {
    pub fn new() -> Self {
        Self::with_failures(MemoryFailures::default())
    }

    pub fn with_failures(failures: MemoryFailures) -> Self {
        Self {
            addresses: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            failures,
            resolves: AtomicU64::new(0),
        }
    }

    /// Builder-style registration
    pub fn with_queue(self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.register(name, address);
        self
    }

    /// Make `name` resolvable to `address`
    pub fn register(&self, name: impl Into<String>, address: impl Into<String>) {
        lock(&self.addresses).insert(name.into(), address.into());
    }

    /// Register every name with a synthetic `memory://{name}` address
    pub fn with_queues<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            let address = format!("memory://{name}");
            self.register(name, address);
        }
        self
    }

    /// Everything sent so far, in send order
    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    /// Messages sent to one address
    pub fn sent_to(&self, address: &str) -> Vec<SentMessage> {
        lock(&self.sent)
            .iter()
            .filter(|m| m.address == address)
            .cloned()
            .collect()
    }

    /// Everything deleted so far, in delete order
    pub fn deleted(&self) -> Vec<DeletedMessage> {
        lock(&self.deleted).clone()
    }

    /// Deletion tokens acknowledged so far
    pub fn deleted_tokens(&self) -> HashSet<String> {
        lock(&self.deleted)
            .iter()
            .map(|d| d.deletion_token.clone())
            .collect()
    }

    /// Number of `resolve_address` calls so far
    pub fn resolve_count(&self) -> u64 {
        self.resolves.load(Ordering::Relaxed)
    }
}

impl Default for MemoryQueues {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueClient for MemoryQueues {
    #[instrument(name = "memory_queue_resolve", skip(self), fields(queue = %name))]
    async fn resolve_address(&self, name: &str) -> Result<Option<String>, ContractError> {
        self.resolves.fetch_add(1, Ordering::Relaxed);
        if self.failures.fail_resolve.iter().any(|n| n == name) {
            return Err(ContractError::queue(name, "injected resolve failure"));
        }
        Ok(lock(&self.addresses).get(name).cloned())
    }

    #[instrument(
        name = "memory_queue_send",
        skip(self, body, attributes),
        fields(address = %address, attributes = attributes.len())
    )]
    async fn send(
        &self,
        address: &str,
        body: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<(), ContractError> {
        if self.failures.fail_send.iter().any(|a| a == address) {
            return Err(ContractError::queue(address, "injected send failure"));
        }
        lock(&self.sent).push(SentMessage {
            address: address.to_string(),
            body: body.to_string(),
            attributes: attributes.clone(),
        });
        Ok(())
    }

    #[instrument(name = "memory_queue_delete", skip(self, deletion_token), fields(address = %address))]
    async fn delete(&self, address: &str, deletion_token: &str) -> Result<(), ContractError> {
        if self.failures.fail_delete.iter().any(|t| t == deletion_token) {
            return Err(ContractError::queue(address, "injected delete failure"));
        }
        lock(&self.deleted).push(DeletedMessage {
            address: address.to_string(),
            deletion_token: deletion_token.to_string(),
        });
        Ok(())
    }
}

/// An object accepted by [`MemoryObjectStore::put`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub region: String,
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
}

/// Object store keeping every put in memory
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<Vec<StoredObject>>,
    failures: MemoryFailures,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failures(failures: MemoryFailures) -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            failures,
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        lock(&self.objects).clone()
    }

    /// Body of the object at `bucket`/`key`, if written
    pub fn get(&self, bucket: &str, key: &str) -> Option<Bytes> {
        lock(&self.objects)
            .iter()
            .find(|o| o.bucket == bucket && o.key == key)
            .map(|o| o.body.clone())
    }

    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryObjectStore {
    #[instrument(
        name = "memory_object_put",
        skip(self, body),
        fields(bucket = %bucket, key = %key, bytes = body.len())
    )]
    async fn put(
        &self,
        region: &str,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<(), ContractError> {
        if self.failures.fail_puts {
            return Err(ContractError::object_store(bucket, key, "injected put failure"));
        }
        debug!(region, "Object stored in memory");
        lock(&self.objects).push(StoredObject {
            region: region.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
        });
        Ok(())
    }
}
