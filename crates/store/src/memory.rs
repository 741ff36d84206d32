use crate::error::{Result, StoreError};
use crate::record::RemoteRecord;
use crate::remote::{enforce_budget, CreateOutcome, RemoteChunkStore};
use async_trait::async_trait;
use fieldkv_chunker::Budget;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process collections, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    collections: Mutex<HashMap<String, Vec<RemoteRecord>>>,
    budget: Budget,
    reverse_reads: bool,
    replace_calls: AtomicUsize,
}

impl MemoryChunkStore {
    #[must_use]
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Return records in reverse write order, like a medium with no ordering guarantee.
    #[must_use]
    pub fn with_reversed_reads(mut self) -> Self {
        self.reverse_reads = true;
        self
    }

    /// Number of successful `replace_all` calls so far
    #[must_use]
    pub fn replace_count(&self) -> usize {
        self.replace_calls.load(Ordering::Relaxed)
    }

    /// Raw records, bypassing the read-order simulation
    pub fn records(&self, name: &str) -> Result<Option<Vec<RemoteRecord>>> {
        Ok(self.lock()?.get(name).cloned())
    }

    /// Overwrite a collection directly, bypassing budget checks.
    pub fn seed(&self, name: &str, records: Vec<RemoteRecord>) -> Result<()> {
        self.lock()?.insert(name.to_string(), records);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<RemoteRecord>>>> {
        self.collections
            .lock()
            .map_err(|_| StoreError::remote("memory store mutex poisoned"))
    }
}

#[async_trait]
impl RemoteChunkStore for MemoryChunkStore {
    async fn create_collection(&self, name: &str) -> Result<CreateOutcome> {
        let mut collections = self.lock()?;
        if collections.contains_key(name) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        collections.insert(name.to_string(), Vec::new());
        Ok(CreateOutcome::Created)
    }

    async fn fetch_all(&self, name: &str) -> Result<Vec<RemoteRecord>> {
        let mut records = self.lock()?.get(name).cloned().unwrap_or_default();
        if self.reverse_reads {
            records.reverse();
        }
        Ok(records)
    }

    async fn replace_all(&self, name: &str, records: Vec<RemoteRecord>) -> Result<()> {
        enforce_budget(&self.budget, &records)?;
        let mut collections = self.lock()?;
        let slot = collections
            .get_mut(name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;
        *slot = records;
        self.replace_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
