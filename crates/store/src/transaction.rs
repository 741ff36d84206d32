//! Read-modify-write around the whole remote collection.
//!
//! The remote boundary offers no compare-and-swap, so two writers that read the same
//! state will both replace the collection and the later one wins. [`ConflictHook`]
//! runs right before the replace so a stronger check can be slotted in without
//! touching callers.

use crate::error::{Result, StoreError};
use crate::record::RemoteRecord;
use crate::remote::RemoteChunkStore;
use async_trait::async_trait;
use fieldkv_codec::StoreMap;
use sha2::{Digest, Sha256};

/// What the transaction saw when it read the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub record_count: usize,
    /// Total characters across all record texts
    pub consumed_len: usize,
    pub fingerprint: u64,
}

impl Snapshot {
    #[must_use]
    pub fn capture(records: &[RemoteRecord]) -> Self {
        Self {
            record_count: records.len(),
            consumed_len: records.iter().map(|r| r.text.len()).sum(),
            fingerprint: records_fingerprint(records),
        }
    }
}

/// Order-independent 64-bit fingerprint of a record set.
#[must_use]
pub fn records_fingerprint(records: &[RemoteRecord]) -> u64 {
    let mut entries: Vec<(Option<u32>, &str)> = records
        .iter()
        .map(|r| (r.sequence, r.text.as_str()))
        .collect();
    entries.sort_unstable();

    let mut hasher = Sha256::new();
    for (sequence, text) in entries {
        match sequence {
            Some(seq) => hasher.update(seq.to_be_bytes()),
            None => hasher.update(b"-"),
        }
        hasher.update(text.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    u64::from_be_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

/// In-memory state between the fetch and the replace
#[derive(Debug, Clone)]
pub struct Transaction {
    map: StoreMap,
    snapshot: Snapshot,
}

impl Transaction {
    pub(crate) const fn new(map: StoreMap, snapshot: Snapshot) -> Self {
        Self { map, snapshot }
    }

    #[must_use]
    pub const fn map(&self) -> &StoreMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut StoreMap {
        &mut self.map
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn into_map(self) -> StoreMap {
        self.map
    }
}

/// Invoked after encoding and before the collection is replaced.
#[async_trait]
pub trait ConflictHook: Send + Sync {
    async fn before_replace(
        &self,
        remote: &dyn RemoteChunkStore,
        name: &str,
        read: &Snapshot,
    ) -> Result<()>;
}

/// Accepts every write (last writer wins)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConflictCheck;

#[async_trait]
impl ConflictHook for NoConflictCheck {
    async fn before_replace(
        &self,
        _remote: &dyn RemoteChunkStore,
        _name: &str,
        _read: &Snapshot,
    ) -> Result<()> {
        Ok(())
    }
}

/// Re-reads the collection and refuses to write if it changed since the snapshot.
///
/// A writer landing between this check and the replace is still lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefetchCheck;

#[async_trait]
impl ConflictHook for RefetchCheck {
    async fn before_replace(
        &self,
        remote: &dyn RemoteChunkStore,
        name: &str,
        read: &Snapshot,
    ) -> Result<()> {
        let current = Snapshot::capture(&remote.fetch_all(name).await?);
        if current.fingerprint != read.fingerprint {
            return Err(StoreError::Conflict(format!(
                "{name} changed since it was read ({} -> {} records)",
                read.record_count, current.record_count
            )));
        }
        Ok(())
    }
}
