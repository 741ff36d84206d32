//! # fieldkv Codec
//!
//! Turns a string-keyed map into a single text-safe payload and back.
//!
//! ## Pipeline
//!
//! ```text
//! StoreMap ──> CBOR bytes ──> zlib ──> base64 ──> EncodedPayload ──> Chunker::split
//!
//! joined text ──> base64 ──> zlib ──> CBOR ──> DecodeOutcome
//!                   │          │        │
//!                   └──────────┴────────┴──> Unrecognized { stage, reason }
//! ```
//!
//! Decoding never fails the caller: an empty input is [`DecodeOutcome::Empty`] and
//! anything that cannot be read back (legacy writers, truncation, garbage) is
//! [`DecodeOutcome::Unrecognized`]. The caller decides whether to warn or abort.
//!
//! ## Example
//!
//! ```rust
//! use fieldkv_codec::{Codec, StoreMap};
//!
//! let codec = Codec::default();
//! let mut map = StoreMap::new();
//! map.insert("a".to_string(), "b".to_string());
//!
//! let payload = codec.encode(&map).unwrap();
//! let decoded = codec.decode(payload.as_str());
//! assert_eq!(decoded.outcome.into_map().unwrap(), map);
//! ```

mod capacity;
mod codec;
mod error;
mod types;

pub use capacity::{CapacityReport, CapacityTracker};
pub use codec::{Codec, CodecConfig, DEFAULT_MAX_DECODED_BYTES};
pub use error::{CodecError, Result};
pub use types::{DecodeOutcome, DecodeStage, Decoded, EncodedPayload, StoreMap, Unrecognized};

// Re-export budget types for convenience
pub use fieldkv_chunker::{Budget, Chunk, Chunker};
