use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Compression error: {0}")]
    Compress(#[from] std::io::Error),

    #[error(
        "Capacity exceeded: payload of {payload_len} chars needs {required} records, budget is {max_records}"
    )]
    CapacityExceeded {
        payload_len: usize,
        required: usize,
        max_records: usize,
    },
}
