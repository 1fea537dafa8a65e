//! Envelope wire format for castbus.
//!
//! Every transported payload is the UTF-8 JSON serialization of an
//! [`Envelope`]: message name, payload, internal flag. No versioning field,
//! no schema negotiation. Decoders accept any field order and treat a
//! missing internal flag as false.

pub mod codec;
pub mod envelope;
pub mod error;

pub use codec::{decode_envelope, decode_envelope_typed, encode_envelope, DEFAULT_MAX_PAYLOAD};
pub use envelope::Envelope;
pub use error::{Result, WireError};
