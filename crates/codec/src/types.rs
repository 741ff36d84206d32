use std::collections::BTreeMap;
use std::fmt;

/// The logical key/value map persisted by the codec.
///
/// Ordered so that encoding the same map always yields the same payload.
pub type StoreMap = BTreeMap<String, String>;

/// Compressed, base64-encoded form of a [`StoreMap`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedPayload {
    text: String,
}

impl EncodedPayload {
    #[must_use]
    pub const fn new(text: String) -> Self {
        Self { text }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters (the payload is ASCII)
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Pipeline stage at which a payload stopped being readable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// Fragments could not be put back in sequence
    Reassemble,
    /// base64
    Text,
    /// zlib
    Decompress,
    /// CBOR
    Deserialize,
}

impl DecodeStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reassemble => "reassemble",
            Self::Text => "text",
            Self::Decompress => "decompress",
            Self::Deserialize => "deserialize",
        }
    }
}

/// Why a non-empty payload could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unrecognized {
    pub stage: DecodeStage,
    pub reason: String,
}

impl Unrecognized {
    pub fn new(stage: DecodeStage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Unrecognized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage: {}", self.stage.as_str(), self.reason)
    }
}

/// Tagged result of decoding fetched record text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A map was read back
    Decoded(StoreMap),
    /// Nothing was stored
    Empty,
    /// Something was stored but it is not a payload this codec understands
    Unrecognized(Unrecognized),
}

impl DecodeOutcome {
    /// The decoded map, if any
    #[must_use]
    pub fn into_map(self) -> Option<StoreMap> {
        match self {
            Self::Decoded(map) => Some(map),
            Self::Empty | Self::Unrecognized(_) => None,
        }
    }

    /// The decoded map, or an empty one for `Empty` and `Unrecognized`
    #[must_use]
    pub fn into_map_or_empty(self) -> StoreMap {
        self.into_map().unwrap_or_default()
    }

    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

/// Outcome plus the length of the text that was consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub outcome: DecodeOutcome,
    pub consumed_len: usize,
}
