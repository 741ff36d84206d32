//! # fieldkv Chunker
//!
//! Splits a flat text payload into an ordered sequence of fragments that each fit
//! into one bounded text field of a remote record, and joins them back.
//!
//! ## Layout
//!
//! ```text
//! Payload (ASCII text, n chars)
//!     │
//!     ├──> split (greedy, fixed width L from the start)
//!     │      └─> Chunk[0..ceil(n/L)]  (all but the last exactly L chars)
//!     │
//!     └──> join / join_ordered
//!            └─> Payload (exact reconstruction when order is known)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fieldkv_chunker::{Budget, Chunker};
//!
//! let chunker = Chunker::new(Budget::default()).unwrap();
//! let payload = "x".repeat(600);
//!
//! let chunks = chunker.split(&payload);
//! assert_eq!(chunks.len(), 3);
//! assert_eq!(Chunker::join(&chunks), payload);
//! ```

mod budget;
mod chunker;
mod error;
mod types;

pub use budget::{Budget, DEFAULT_MAX_FIELD_CHARS, DEFAULT_MAX_RECORDS};
pub use chunker::Chunker;
pub use error::{ChunkerError, Result};
pub use types::Chunk;
