//! High-level bus layer for castbus.
//!
//! This is the "just works" layer. Attach to named topics through a [`Hub`],
//! post named JSON messages, and register per-name receive callbacks, with
//! optional lifecycle hooks around each operation.

pub mod bus;
pub mod config;
pub mod control;
pub mod error;
pub mod hooks;
pub mod hub;

pub use bus::{Bus, MessageCallback};
pub use castbus_wire::Envelope;
pub use config::{BusConfig, HubConfig};
pub use control::REMOVE_MESSAGE;
pub use error::{BusError, Result};
pub use hooks::{CloseHook, Hooks, MessageHook};
pub use hub::Hub;
