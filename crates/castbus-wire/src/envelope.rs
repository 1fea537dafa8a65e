use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The unit of transport: a named message carrying an opaque payload, plus
/// a flag marking bus-generated control traffic.
///
/// On the wire this is a JSON object with the keys `message`, `data`, and
/// `isInternal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Logical message name, or a control-message identifier.
    pub message: String,
    /// Payload; any JSON-serializable value.
    pub data: T,
    /// True only for control messages generated by the bus itself.
    #[serde(rename = "isInternal", default)]
    pub is_internal: bool,
}

impl<T> Envelope<T> {
    /// Build a user envelope. The internal flag is always false here;
    /// control envelopes go through [`Envelope::control`].
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            is_internal: false,
        }
    }

    /// Build a bus-generated control envelope.
    pub fn control(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
            is_internal: true,
        }
    }
}
