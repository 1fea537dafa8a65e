//! Internal control-message handling.
//!
//! Control envelopes coordinate registry state across contexts and are
//! never delivered to user callbacks.

use serde_json::Value;

use castbus_wire::Envelope;

use crate::bus::Registry;

/// Default control-message identifier: cross-context callback removal.
///
/// The identifier is configuration, not a fixed protocol constant; see
/// [`crate::BusConfig::remove_control_name`]. Buses sharing a topic must
/// agree on the value for removal to propagate between them.
pub const REMOVE_MESSAGE: &str = "removeMessage";

/// Apply a control envelope to the local registry.
///
/// Returns false when the identifier is unrecognized. Unrecognized control
/// traffic is ignored, never surfaced to the error hook.
pub(crate) fn apply(registry: &Registry, remove_control_name: &str, envelope: &Envelope) -> bool {
    if envelope.message != remove_control_name {
        return false;
    }
    match &envelope.data {
        Value::String(name) => {
            registry.remove(name);
        }
        _ => {
            tracing::warn!(
                message = %envelope.message,
                "removal control message carried a non-string payload"
            );
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::bus::MessageCallback;

    fn registry_with(names: &[&str]) -> Registry {
        let registry = Registry::new();
        for name in names {
            registry.insert(name.to_string(), Arc::new(|_| {}) as MessageCallback);
        }
        registry
    }

    #[test]
    fn removal_deletes_named_registration() {
        let registry = registry_with(&["counter", "status"]);
        let envelope = Envelope::control(REMOVE_MESSAGE, json!("counter"));

        assert!(apply(&registry, REMOVE_MESSAGE, &envelope));
        assert!(!registry.contains_key("counter"));
        assert!(registry.contains_key("status"));
    }

    #[test]
    fn unrecognized_identifier_is_ignored() {
        let registry = registry_with(&["counter"]);
        let envelope = Envelope::control("compactRegistry", json!("counter"));

        assert!(!apply(&registry, REMOVE_MESSAGE, &envelope));
        assert!(registry.contains_key("counter"));
    }

    #[test]
    fn configured_identifier_overrides_default() {
        let registry = registry_with(&["counter"]);
        let envelope = Envelope::control("rm", json!("counter"));

        assert!(apply(&registry, "rm", &envelope));
        assert!(!registry.contains_key("counter"));

        // The default identifier no longer matches under the override.
        let default_shaped = Envelope::control(REMOVE_MESSAGE, json!("counter"));
        assert!(!apply(&registry, "rm", &default_shaped));
    }

    #[test]
    fn non_string_payload_is_dropped_but_recognized() {
        let registry = registry_with(&["counter"]);
        let envelope = Envelope::control(REMOVE_MESSAGE, json!({"name": "counter"}));

        assert!(apply(&registry, REMOVE_MESSAGE, &envelope));
        assert!(registry.contains_key("counter"));
    }
}
