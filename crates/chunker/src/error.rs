use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while splitting or reassembling a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkerError {
    /// Invalid budget
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sequence index is missing from the fetched chunks
    #[error("Missing chunk: expected sequence {expected}, found {found}")]
    MissingChunk { expected: usize, found: usize },

    /// The same sequence index appears more than once
    #[error("Duplicate chunk sequence {0}")]
    DuplicateChunk(usize),

    /// A chunk exceeds the per-field limit
    #[error("Chunk {index} is {len} chars, limit is {limit}")]
    OversizedChunk {
        index: usize,
        len: usize,
        limit: usize,
    },
}

impl ChunkerError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
