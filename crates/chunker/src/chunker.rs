use crate::budget::Budget;
use crate::error::{ChunkerError, Result};
use crate::types::Chunk;

/// Splits payloads into fixed-width fragments bounded by the per-field limit
#[derive(Debug, Clone)]
pub struct Chunker {
    budget: Budget,
}

impl Chunker {
    /// Create a new chunker for the given budget
    pub fn new(budget: Budget) -> Result<Self> {
        budget.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self { budget })
    }

    #[must_use]
    pub const fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Split a payload greedily from the start into chunks of at most
    /// `max_field_chars` characters.
    ///
    /// An empty payload yields no chunks. Boundaries always fall on char
    /// boundaries, so any input is accepted.
    #[must_use]
    pub fn split(&self, payload: &str) -> Vec<Chunk> {
        let limit = self.budget.max_field_chars;
        let mut chunks = Vec::with_capacity(self.budget.records_needed(payload.len()));
        let mut start = 0;
        let mut chars_in_chunk = 0;

        for (offset, _) in payload.char_indices() {
            if chars_in_chunk == limit {
                chunks.push(Chunk::new(chunks.len(), payload[start..offset].to_string()));
                start = offset;
                chars_in_chunk = 0;
            }
            chars_in_chunk += 1;
        }

        if start < payload.len() {
            chunks.push(Chunk::new(chunks.len(), payload[start..].to_string()));
        }

        log::debug!(
            "Split {} chars into {} chunks (limit {})",
            payload.len(),
            chunks.len(),
            limit
        );
        chunks
    }

    /// Concatenate chunk contents in the order given.
    #[must_use]
    pub fn join(chunks: &[Chunk]) -> String {
        let mut out = String::with_capacity(chunks.iter().map(|c| c.content.len()).sum());
        for chunk in chunks {
            out.push_str(&chunk.content);
        }
        out
    }

    /// Sort chunks by their sequence index and concatenate them.
    ///
    /// Indices must form the contiguous range `0..chunks.len()`.
    pub fn join_ordered(mut chunks: Vec<Chunk>) -> Result<String> {
        chunks.sort_by_key(|c| c.index);

        for (expected, chunk) in chunks.iter().enumerate() {
            match chunk.index.cmp(&expected) {
                std::cmp::Ordering::Equal => {}
                std::cmp::Ordering::Less => return Err(ChunkerError::DuplicateChunk(chunk.index)),
                std::cmp::Ordering::Greater => {
                    return Err(ChunkerError::MissingChunk {
                        expected,
                        found: chunk.index,
                    })
                }
            }
        }

        Ok(Self::join(&chunks))
    }

    /// Check that every chunk fits the per-field limit.
    pub fn verify(&self, chunks: &[Chunk]) -> Result<()> {
        let limit = self.budget.max_field_chars;
        for chunk in chunks {
            let len = chunk.char_len();
            if len > limit {
                return Err(ChunkerError::OversizedChunk {
                    index: chunk.index,
                    len,
                    limit,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunker(limit: usize) -> Chunker {
        Chunker::new(Budget {
            max_records: 500,
            max_field_chars: limit,
        })
        .unwrap()
    }

    #[test]
    fn empty_payload_yields_no_chunks() {
        assert!(chunker(255).split("").is_empty());
    }

    #[test]
    fn splits_on_exact_multiple() {
        let chunks = chunker(4).split("abcdefgh");
        assert_eq!(
            chunks,
            vec![
                Chunk::new(0, "abcd".to_string()),
                Chunk::new(1, "efgh".to_string()),
            ]
        );
    }

    #[test]
    fn last_chunk_holds_remainder() {
        let chunks = chunker(4).split("abcdefghi");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].content, "i");
    }

    #[test]
    fn short_payload_is_single_chunk() {
        let chunks = chunker(255).split("abc");
        assert_eq!(chunks, vec![Chunk::new(0, "abc".to_string())]);
    }

    #[test]
    fn multibyte_input_splits_on_char_boundaries() {
        let chunks = chunker(2).split("ééé");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "éé");
        assert_eq!(chunks[1].content, "é");
    }

    #[test]
    fn join_ordered_restores_shuffled_chunks() {
        let payload = "the quick brown fox";
        let mut chunks = chunker(3).split(payload);
        chunks.reverse();
        assert_eq!(Chunker::join_ordered(chunks).unwrap(), payload);
    }

    #[test]
    fn join_ordered_rejects_gaps() {
        let chunks = vec![Chunk::new(0, "a".into()), Chunk::new(2, "c".into())];
        assert_eq!(
            Chunker::join_ordered(chunks),
            Err(ChunkerError::MissingChunk {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn join_ordered_rejects_duplicates() {
        let chunks = vec![Chunk::new(0, "a".into()), Chunk::new(0, "b".into())];
        assert_eq!(
            Chunker::join_ordered(chunks),
            Err(ChunkerError::DuplicateChunk(0))
        );
    }

    #[test]
    fn verify_flags_oversized_chunk() {
        let c = chunker(3);
        let chunks = vec![Chunk::new(0, "abcd".into())];
        assert!(matches!(
            c.verify(&chunks),
            Err(ChunkerError::OversizedChunk { index: 0, len: 4, limit: 3 })
        ));
        assert!(c.verify(&c.split("abcdefg")).is_ok());
    }

    #[test]
    fn rejects_zero_width_budget() {
        let err = Chunker::new(Budget {
            max_records: 1,
            max_field_chars: 0,
        })
        .unwrap_err();
        assert!(matches!(err, ChunkerError::InvalidConfig(_)));
    }
}
