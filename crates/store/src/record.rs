use fieldkv_chunker::Chunk;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inert source network put on firewall-rule records.
pub const PLACEHOLDER_SOURCE_NET: &str = "0.0.0.0/32";
/// Inert port put on firewall-rule records.
pub const PLACEHOLDER_PORT: &str = "80";
/// Key prefix for label-shaped records.
pub const LABEL_KEY_PREFIX: &str = "kv.";

/// Shape of the remote objects used to hold chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    /// Firewall rules; chunk text lives in the rule description
    #[default]
    Rules,
    /// Key labels; chunk text lives in the label value
    Labels,
}

impl Medium {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Labels => "labels",
        }
    }

    /// Wrap each chunk in a record of this medium's shape.
    #[must_use]
    pub fn build_records(self, chunks: Vec<Chunk>) -> Vec<RemoteRecord> {
        chunks
            .into_iter()
            .map(|chunk| {
                let sequence = chunk.index as u32;
                RemoteRecord {
                    sequence: Some(sequence),
                    attributes: self.attributes_for(sequence),
                    text: chunk.content,
                }
            })
            .collect()
    }

    fn attributes_for(self, sequence: u32) -> RecordAttributes {
        match self {
            Self::Rules => RecordAttributes::FirewallRule {
                direction: "in".to_string(),
                protocol: "tcp".to_string(),
                port: PLACEHOLDER_PORT.to_string(),
                source_ips: vec![PLACEHOLDER_SOURCE_NET.to_string()],
            },
            Self::Labels => RecordAttributes::Label {
                key: format!("{LABEL_KEY_PREFIX}{sequence:03}"),
            },
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Medium {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rules" | "firewall" => Ok(Self::Rules),
            "labels" | "label" => Ok(Self::Labels),
            other => Err(format!("unknown medium '{other}' (expected rules|labels)")),
        }
    }
}

/// Fields the remote medium requires but this store never interprets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordAttributes {
    FirewallRule {
        direction: String,
        protocol: String,
        port: String,
        source_ips: Vec<String>,
    },
    Label {
        key: String,
    },
}

/// One slot of the remote collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Position of the chunk in the payload; absent on records from older writers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    /// Chunk text (at most L chars)
    pub text: String,

    pub attributes: RecordAttributes,
}

impl RemoteRecord {
    #[must_use]
    pub fn text_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Turn fetched records back into chunks.
///
/// When every record carries a sequence index it becomes the chunk index.
/// Otherwise the records come from a writer that relied on fetch order, and
/// fetch order is used.
#[must_use]
pub fn records_to_chunks(records: Vec<RemoteRecord>) -> Vec<Chunk> {
    let sequenced = records.iter().all(|r| r.sequence.is_some());
    if !sequenced && !records.is_empty() {
        log::debug!(
            "{} records lack sequence indices, joining in fetch order",
            records.len()
        );
    }

    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let index = match record.sequence {
                Some(seq) if sequenced => seq as usize,
                _ => position,
            };
            Chunk::new(index, record.text)
        })
        .collect()
}
