use crate::error::{Result, StoreError};
use crate::record::{records_to_chunks, Medium, RemoteRecord};
use crate::remote::{CreateOutcome, RemoteChunkStore};
use crate::transaction::{ConflictHook, NoConflictCheck, Snapshot, Transaction};
use fieldkv_chunker::{Budget, Chunker};
use fieldkv_codec::{
    CapacityTracker, Codec, CodecConfig, DecodeOutcome, DecodeStage, Decoded, StoreMap,
    Unrecognized,
};

/// What to do when the stored payload cannot be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Log a warning and continue from an empty map
    #[default]
    Warn,
    /// Fail the operation with [`StoreError::Decode`]
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyExisted,
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub medium: Medium,
    pub budget: Budget,
    pub codec: CodecConfig,
    pub decode_policy: DecodePolicy,
    /// Log capacity usage after every fetch and write
    pub report_capacity: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            medium: Medium::default(),
            budget: Budget::default(),
            codec: CodecConfig::default(),
            decode_policy: DecodePolicy::default(),
            report_capacity: true,
        }
    }
}

/// Key/value map persisted across a remote collection of bounded text records.
///
/// Every operation fetches and decodes the whole collection; writes re-encode the
/// whole map and replace the whole collection. Nothing is cached between calls.
///
/// Concurrent writers are not coordinated: two `set` calls that read the same
/// state both replace the collection and the second silently discards the first
/// (lost update). A [`ConflictHook`] can narrow that window; it cannot close it
/// without a compare-and-swap primitive on the remote side.
pub struct KeyValueStore<R: RemoteChunkStore> {
    remote: R,
    name: String,
    medium: Medium,
    chunker: Chunker,
    codec: Codec,
    capacity: CapacityTracker,
    decode_policy: DecodePolicy,
    conflict_hook: Box<dyn ConflictHook>,
}

impl<R: RemoteChunkStore> KeyValueStore<R> {
    pub fn new(remote: R, name: impl Into<String>, options: StoreOptions) -> Result<Self> {
        Ok(Self {
            remote,
            name: name.into(),
            medium: options.medium,
            chunker: Chunker::new(options.budget)?,
            codec: Codec::new(options.codec),
            capacity: CapacityTracker::new(options.budget).with_reporting(options.report_capacity),
            decode_policy: options.decode_policy,
            conflict_hook: Box::new(NoConflictCheck),
        })
    }

    #[must_use]
    pub fn with_conflict_hook(mut self, hook: impl ConflictHook + 'static) -> Self {
        self.conflict_hook = Box::new(hook);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Create the remote collection. An existing one is not an error.
    pub async fn init(&self) -> Result<InitOutcome> {
        let outcome = match self.remote.create_collection(&self.name).await? {
            CreateOutcome::Created => {
                log::info!("created new database: {}", self.name);
                InitOutcome::Created
            }
            CreateOutcome::AlreadyExists => {
                log::info!("database {} already exists", self.name);
                InitOutcome::AlreadyExisted
            }
        };

        self.begin().await?;
        Ok(outcome)
    }

    /// Value for `key`, `None` when absent.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let tx = self.begin().await?;
        Ok(tx.into_map().remove(key))
    }

    /// Insert or overwrite `key`. Lengths are the caller's responsibility.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut tx = self.begin().await?;
        tx.map_mut().insert(key.to_string(), value.to_string());
        self.commit(tx).await?;
        log::info!("OK");
        Ok(())
    }

    /// All keys, in map order.
    pub async fn list(&self) -> Result<Vec<String>> {
        let tx = self.begin().await?;
        Ok(tx.into_map().into_keys().collect())
    }

    /// Fetch and decode the collection.
    pub async fn begin(&self) -> Result<Transaction> {
        let records = self.remote.fetch_all(&self.name).await?;
        let snapshot = Snapshot::capture(&records);
        let decoded = self.decode_records(records, &snapshot);

        let map = match decoded.outcome {
            DecodeOutcome::Decoded(map) => map,
            DecodeOutcome::Empty => StoreMap::new(),
            DecodeOutcome::Unrecognized(reason) => match self.decode_policy {
                DecodePolicy::Warn => {
                    log::warn!(
                        "could not parse records (db might be empty or old format): {reason}"
                    );
                    StoreMap::new()
                }
                DecodePolicy::Abort => return Err(StoreError::Decode(reason)),
            },
        };

        self.capacity.report(decoded.consumed_len);
        Ok(Transaction::new(map, snapshot))
    }

    /// Encode the transaction's map and replace the collection with it.
    ///
    /// Returns the encoded payload length. Nothing is written when the payload
    /// would need more than the record budget.
    pub async fn commit(&self, tx: Transaction) -> Result<usize> {
        let payload = self.codec.encode(tx.map())?;
        self.capacity.ensure_fits(payload.len())?;

        let chunks = self.chunker.split(payload.as_str());
        self.chunker.verify(&chunks)?;
        for chunk in &chunks {
            log::debug!("Chunk {}: {} chars", chunk.index, chunk.content.len());
        }
        let records = self.medium.build_records(chunks);

        self.conflict_hook
            .before_replace(&self.remote, &self.name, tx.snapshot())
            .await?;
        self.remote.replace_all(&self.name, records).await?;

        self.capacity.report(payload.len());
        Ok(payload.len())
    }

    fn decode_records(
        &self,
        records: Vec<RemoteRecord>,
        snapshot: &Snapshot,
    ) -> Decoded {
        match Chunker::join_ordered(records_to_chunks(records)) {
            Ok(text) => self.codec.decode(&text),
            Err(err) => Decoded {
                outcome: DecodeOutcome::Unrecognized(Unrecognized::new(
                    DecodeStage::Reassemble,
                    err.to_string(),
                )),
                consumed_len: snapshot.consumed_len,
            },
        }
    }
}
