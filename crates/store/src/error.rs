use fieldkv_codec::Unrecognized;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Collection already exists: {0}")]
    AlreadyExists(String),

    #[error("Remote rejected records: {0}")]
    Rejected(String),

    #[error("Stored payload is unreadable: {0}")]
    Decode(Unrecognized),

    #[error("Concurrent modification detected: {0}")]
    Conflict(String),

    #[error("Codec error: {0}")]
    Codec(#[from] fieldkv_codec::CodecError),

    #[error("Chunker error: {0}")]
    Chunker(#[from] fieldkv_chunker::ChunkerError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl StoreError {
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteUnavailable(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}
