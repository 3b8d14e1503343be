//! Persisted operation lookup.
//!
//! Requests carry an operation hash instead of query text; unknown hashes
//! yield `None` and must be rejected by the caller.

use gschema_descriptor::{OperationRecord, OperationRegistry};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct PersistedQueries {
    operations: FxHashMap<String, OperationRecord>,
}

impl PersistedQueries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every operation of `registries`. When two registries carry the
    /// same hash with different operations, the later one is kept.
    pub fn from_registries<'a>(registries: impl IntoIterator<Item = &'a OperationRegistry>) -> Self {
        let mut store = Self::new();
        for registry in registries {
            for record in &registry.operations {
                store.insert(record.clone());
            }
            debug!(destination = %registry.destination, operations = registry.len(), "loaded persisted operations");
        }
        store
    }

    pub fn insert(&mut self, record: OperationRecord) {
        if let Some(previous) = self.operations.get(&record.hash) {
            if previous.operation_name != record.operation_name {
                warn!(
                    hash = %record.hash,
                    previous = %previous.operation_name,
                    current = %record.operation_name,
                    "hash registered twice"
                );
            }
        }
        self.operations.insert(record.hash.clone(), record);
    }

    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&OperationRecord> {
        self.operations.get(hash)
    }

    /// Operation name registered under `hash`.
    #[must_use]
    pub fn opname(&self, hash: &str) -> Option<&str> {
        self.get(hash).map(|op| op.operation_name.as_str())
    }

    /// Operation text registered under `hash`.
    #[must_use]
    pub fn source(&self, hash: &str) -> Option<&str> {
        self.get(hash).map(|op| op.body.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
