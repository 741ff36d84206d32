//! # fieldkv Store
//!
//! A key/value store layered over a remote collection that was never meant to be
//! one: many records, one short text field each.
//!
//! ## Flow
//!
//! ```text
//! get / list / set / init
//!     │
//!     ├──> RemoteChunkStore::fetch_all
//!     │      └─> records ──> sort by sequence ──> join ──> Codec::decode ──> StoreMap
//!     │
//!     ├──> (writes) mutate StoreMap
//!     │      └─> Codec::encode ──> CapacityTracker::ensure_fits ──> Chunker::split
//!     │            └─> Medium::build_records ──> ConflictHook ──> replace_all
//!     │
//!     └──> CapacityTracker::report
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use fieldkv_store::{FileChunkStore, KeyValueStore, StoreOptions};
//! use fieldkv_chunker::Budget;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let remote = FileChunkStore::new("/tmp/fieldkv", Budget::default());
//!     let kv = KeyValueStore::new(remote, "hkv-0", StoreOptions::default())?;
//!
//!     kv.init().await?;
//!     kv.set("greeting", "hello").await?;
//!     assert_eq!(kv.get("greeting").await?.as_deref(), Some("hello"));
//!     Ok(())
//! }
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod record;
mod remote;
mod transaction;

pub use error::{Result, StoreError};
pub use file::FileChunkStore;
pub use kv::{DecodePolicy, InitOutcome, KeyValueStore, StoreOptions};
pub use memory::MemoryChunkStore;
pub use record::{
    records_to_chunks, Medium, RecordAttributes, RemoteRecord, LABEL_KEY_PREFIX,
    PLACEHOLDER_PORT, PLACEHOLDER_SOURCE_NET,
};
pub use remote::{CreateOutcome, RemoteChunkStore};
pub use transaction::{
    records_fingerprint, ConflictHook, NoConflictCheck, RefetchCheck, Snapshot, Transaction,
};

// Re-export codec types for convenience
pub use fieldkv_codec::{Budget, StoreMap};
