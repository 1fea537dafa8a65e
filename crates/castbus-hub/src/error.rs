/// Errors that can occur in bus operations.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] castbus_transport::TransportError),

    /// Wire-format error.
    #[error("wire error: {0}")]
    Wire(#[from] castbus_wire::WireError),

    /// The bus has been closed.
    #[error("bus is closed")]
    Closed,

    /// Topic names must be non-empty.
    #[error("channel name must not be empty")]
    EmptyChannelName,
}

pub type Result<T> = std::result::Result<T, BusError>;
