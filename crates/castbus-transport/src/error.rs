/// Errors that can occur in broadcast transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No async runtime is available to host broadcast delivery.
    #[error("no tokio runtime available for broadcast delivery")]
    RuntimeUnavailable,

    /// The topic has no live endpoints left to deliver to.
    #[error("topic closed (no live endpoints)")]
    Closed,

    /// This endpoint fell behind and the topic buffer overwrote transmissions.
    #[error("endpoint lagged, {skipped} transmissions dropped")]
    Lagged { skipped: u64 },
}

pub type Result<T> = std::result::Result<T, TransportError>;
