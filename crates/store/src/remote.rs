use crate::error::{Result, StoreError};
use crate::record::RemoteRecord;
use async_trait::async_trait;
use fieldkv_chunker::Budget;
use std::sync::Arc;

/// Result of asking the remote side to create a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// The remote object collection used as a dumb record store.
///
/// Implementations hold many records with one short text field each. There is no
/// partial update and no compare-and-swap: readers get the whole collection and
/// writers replace the whole collection.
#[async_trait]
pub trait RemoteChunkStore: Send + Sync {
    /// Create `name`. An existing collection is reported, not treated as an error.
    async fn create_collection(&self, name: &str) -> Result<CreateOutcome>;

    /// Every record of `name`, empty when the collection is missing or has no records.
    async fn fetch_all(&self, name: &str) -> Result<Vec<RemoteRecord>>;

    /// Replace every record of `name` with `records`.
    async fn replace_all(&self, name: &str, records: Vec<RemoteRecord>) -> Result<()>;
}

#[async_trait]
impl<T: RemoteChunkStore + ?Sized> RemoteChunkStore for Arc<T> {
    async fn create_collection(&self, name: &str) -> Result<CreateOutcome> {
        (**self).create_collection(name).await
    }

    async fn fetch_all(&self, name: &str) -> Result<Vec<RemoteRecord>> {
        (**self).fetch_all(name).await
    }

    async fn replace_all(&self, name: &str, records: Vec<RemoteRecord>) -> Result<()> {
        (**self).replace_all(name, records).await
    }
}

/// Reject record sets the real medium would refuse.
pub(crate) fn enforce_budget(budget: &Budget, records: &[RemoteRecord]) -> Result<()> {
    if records.len() > budget.max_records {
        return Err(StoreError::rejected(format!(
            "{} records exceed the limit of {}",
            records.len(),
            budget.max_records
        )));
    }

    if let Some(record) = records
        .iter()
        .find(|r| r.text_chars() > budget.max_field_chars)
    {
        return Err(StoreError::rejected(format!(
            "record {:?} has {} chars, limit is {}",
            record.sequence,
            record.text_chars(),
            budget.max_field_chars
        )));
    }

    Ok(())
}
