/// Errors that can occur during envelope encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The payload could not be serialized to JSON.
    #[error("envelope encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The incoming text is not a valid envelope.
    #[error("envelope decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The encoded envelope exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
