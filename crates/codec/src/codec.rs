use crate::error::{CodecError, Result};
use crate::types::{DecodeOutcome, DecodeStage, Decoded, EncodedPayload, StoreMap, Unrecognized};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Upper bound on decompressed payload size accepted by `decode`.
pub const DEFAULT_MAX_DECODED_BYTES: usize = 16 * 1024 * 1024;

/// Codec tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// zlib level, 0-9
    pub compression_level: u32,

    /// Decompressed payloads larger than this are treated as unrecognized
    pub max_decoded_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            // Record space is the scarce resource; CPU is not.
            compression_level: 9,
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }
}

/// Map <-> text payload codec
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config: CodecConfig {
                compression_level: config.compression_level.min(9),
                ..config
            },
        }
    }

    /// Serialize, compress and base64-encode `map`.
    ///
    /// An empty map encodes to an empty payload, which splits into zero chunks.
    pub fn encode(&self, map: &StoreMap) -> Result<EncodedPayload> {
        if map.is_empty() {
            return Ok(EncodedPayload::default());
        }

        let mut serialized = Vec::new();
        ciborium::into_writer(map, &mut serialized)
            .map_err(|e| CodecError::Serialize(e.to_string()))?;

        let compressed = self.compress(&serialized)?;
        let text = STANDARD.encode(compressed);

        log::debug!(
            "Encoded {} entries: {} bytes serialized, {} chars encoded",
            map.len(),
            serialized.len(),
            text.len()
        );
        Ok(EncodedPayload::new(text))
    }

    /// Reverse `encode`. Never fails; see [`DecodeOutcome`].
    #[must_use]
    pub fn decode(&self, text: &str) -> Decoded {
        let consumed_len = text.len();
        if text.is_empty() {
            return Decoded {
                outcome: DecodeOutcome::Empty,
                consumed_len: 0,
            };
        }

        let outcome = match self.try_decode(text) {
            Ok(map) => DecodeOutcome::Decoded(map),
            Err(unrecognized) => DecodeOutcome::Unrecognized(unrecognized),
        };

        Decoded {
            outcome,
            consumed_len,
        }
    }

    fn try_decode(&self, text: &str) -> std::result::Result<StoreMap, Unrecognized> {
        let compressed = STANDARD
            .decode(text.as_bytes())
            .map_err(|e| unrecognized(DecodeStage::Text, e))?;

        let serialized = self.decompress_with_limit(&compressed)?;

        ciborium::from_reader(serialized.as_slice())
            .map_err(|e| unrecognized(DecodeStage::Deserialize, e))
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            ZlibEncoder::new(Vec::new(), Compression::new(self.config.compression_level));
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }

    fn decompress_with_limit(&self, bytes: &[u8]) -> std::result::Result<Vec<u8>, Unrecognized> {
        let max_len = self.config.max_decoded_bytes;
        let decoder = ZlibDecoder::new(bytes);
        let mut out = Vec::new();
        decoder
            .take(max_len.saturating_add(1) as u64)
            .read_to_end(&mut out)
            .map_err(|e| unrecognized(DecodeStage::Decompress, e))?;
        if out.len() > max_len {
            return Err(unrecognized(
                DecodeStage::Decompress,
                format!("decoded payload exceeds {max_len} bytes"),
            ));
        }
        Ok(out)
    }
}

fn unrecognized(stage: DecodeStage, reason: impl ToString) -> Unrecognized {
    Unrecognized::new(stage, reason.to_string())
}
