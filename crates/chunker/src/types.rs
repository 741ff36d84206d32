use serde::{Deserialize, Serialize};

/// One bounded fragment of an encoded payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this fragment in the payload (0-indexed)
    pub index: usize,

    /// Fragment text
    pub content: String,
}

impl Chunk {
    /// Create a new chunk
    #[must_use]
    pub const fn new(index: usize, content: String) -> Self {
        Self { index, content }
    }

    /// Length in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
