//! In-process broadcast transport for castbus.
//!
//! Provides the platform primitive everything else builds on: a named
//! broadcast lane ([`Topic`]) that fans a text payload out to every attached
//! endpoint except the sender. Delivery order is per-sender FIFO and is
//! entirely owned by the underlying `tokio::sync::broadcast` channel.
//!
//! This is the lowest layer of castbus. Everything else builds on the
//! [`Endpoint`] halves handed out here.

pub mod error;
pub mod runtime;
pub mod topic;

pub use error::{Result, TransportError};
pub use runtime::runtime_available;
pub use topic::{Endpoint, EndpointReceiver, EndpointSender, Topic, DEFAULT_TOPIC_CAPACITY};
