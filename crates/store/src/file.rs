use crate::error::{Result, StoreError};
use crate::record::RemoteRecord;
use crate::remote::{enforce_budget, CreateOutcome, RemoteChunkStore};
use async_trait::async_trait;
use fieldkv_chunker::Budget;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const COLLECTION_EXTENSION: &str = "json";

#[derive(Serialize, Deserialize, Debug, Default)]
struct CollectionDocument {
    name: String,
    records: Vec<RemoteRecord>,
}

/// Local stand-in for the remote medium: one JSON document per collection.
///
/// Applies the same record budget the real medium does, so oversize writes fail
/// the same way.
#[derive(Debug, Clone)]
pub struct FileChunkStore {
    root: PathBuf,
    budget: Budget,
}

impl FileChunkStore {
    pub fn new(root: impl AsRef<Path>, budget: Budget) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            budget,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !name.starts_with('.');
        if !valid {
            return Err(StoreError::remote(format!(
                "invalid collection name '{name}'"
            )));
        }
        Ok(self.root.join(format!("{name}.{COLLECTION_EXTENSION}")))
    }

    async fn write_document(&self, path: &Path, doc: &CollectionDocument) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        let tmp = path.with_extension(format!("{COLLECTION_EXTENSION}.tmp"));
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteChunkStore for FileChunkStore {
    async fn create_collection(&self, name: &str) -> Result<CreateOutcome> {
        let path = self.collection_path(name)?;
        fs::create_dir_all(&self.root).await?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Ok(CreateOutcome::AlreadyExists)
            }
            Err(err) => return Err(err.into()),
        };

        let doc = CollectionDocument {
            name: name.to_string(),
            records: Vec::new(),
        };
        file.write_all(&serde_json::to_vec_pretty(&doc)?).await?;
        file.flush().await?;
        log::debug!("Created collection file {}", path.display());
        Ok(CreateOutcome::Created)
    }

    async fn fetch_all(&self, name: &str) -> Result<Vec<RemoteRecord>> {
        let path = self.collection_path(name)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let doc: CollectionDocument = serde_json::from_slice(&bytes)?;
        log::debug!("Fetched {} records from {}", doc.records.len(), name);
        Ok(doc.records)
    }

    async fn replace_all(&self, name: &str, records: Vec<RemoteRecord>) -> Result<()> {
        let path = self.collection_path(name)?;
        if fs::metadata(&path).await.is_err() {
            return Err(StoreError::CollectionNotFound(name.to_string()));
        }
        enforce_budget(&self.budget, &records)?;

        let doc = CollectionDocument {
            name: name.to_string(),
            records,
        };
        self.write_document(&path, &doc).await?;
        log::debug!("Replaced {} with {} records", name, doc.records.len());
        Ok(())
    }
}
