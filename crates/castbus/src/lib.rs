//! Cross-context named-message broadcasting over in-process topics.
//!
//! castbus lets independent execution contexts in one process exchange
//! named, JSON-encoded messages through shared named topics, with receive
//! callbacks keyed by message name.
//!
//! # Crate Structure
//!
//! - [`transport`] — In-process broadcast topics (the platform primitive)
//! - [`wire`] — The three-field JSON envelope wire format
//! - [`hub`] — Hub/bus management: registries, hooks, control messages
//!   (behind the `hub` feature)

/// Re-export transport types.
pub mod transport {
    pub use castbus_transport::*;
}

/// Re-export wire types.
pub mod wire {
    pub use castbus_wire::*;
}

/// Re-export hub types (requires `hub` feature).
#[cfg(feature = "hub")]
pub mod hub {
    pub use castbus_hub::*;
}
