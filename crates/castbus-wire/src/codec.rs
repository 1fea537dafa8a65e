use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::{Result, WireError};

/// Default maximum encoded envelope size: 1 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 1024 * 1024;

/// Encode an envelope to its UTF-8 JSON wire form.
///
/// The size ceiling applies to the whole encoded envelope, not just the
/// payload field.
pub fn encode_envelope<T: Serialize>(
    envelope: &Envelope<T>,
    max_payload_size: usize,
) -> Result<String> {
    let text = serde_json::to_string(envelope).map_err(WireError::Encode)?;
    if text.len() > max_payload_size {
        return Err(WireError::PayloadTooLarge {
            size: text.len(),
            max: max_payload_size,
        });
    }
    Ok(text)
}

/// Decode a wire payload into an envelope with an opaque JSON payload.
pub fn decode_envelope(text: &str) -> Result<Envelope> {
    serde_json::from_str(text).map_err(WireError::Decode)
}

/// Decode a wire payload into an envelope with a typed payload.
pub fn decode_envelope_typed<T: DeserializeOwned>(text: &str) -> Result<Envelope<T>> {
    serde_json::from_str(text).map_err(WireError::Decode)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct CounterUpdate {
        count: u64,
        label: String,
    }

    #[test]
    fn roundtrip_struct_payload() {
        let envelope = Envelope::new(
            "counter",
            CounterUpdate {
                count: 7,
                label: "clicks".to_string(),
            },
        );

        let text = encode_envelope(&envelope, DEFAULT_MAX_PAYLOAD).unwrap();
        let decoded = decode_envelope_typed::<CounterUpdate>(&text).unwrap();

        assert_eq!(decoded, envelope);
    }

    #[test]
    fn roundtrip_scalar_and_null_payloads() {
        for data in [json!("plain text"), json!(42), json!(null), json!([1, 2])] {
            let envelope = Envelope::new("anything", data);
            let text = encode_envelope(&envelope, DEFAULT_MAX_PAYLOAD).unwrap();
            assert_eq!(decode_envelope(&text).unwrap(), envelope);
        }
    }

    #[test]
    fn wire_shape_has_exactly_three_keys() {
        let envelope = Envelope::new("shape", json!({"k": true}));
        let text = encode_envelope(&envelope, DEFAULT_MAX_PAYLOAD).unwrap();

        let raw: Value = serde_json::from_str(&text).unwrap();
        let object = raw.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["message"], json!("shape"));
        assert_eq!(object["data"], json!({"k": true}));
        assert_eq!(object["isInternal"], json!(false));
    }

    #[test]
    fn decode_accepts_any_field_order() {
        let text = r#"{"isInternal":false,"data":{"count":1,"label":"x"},"message":"counter"}"#;
        let decoded = decode_envelope_typed::<CounterUpdate>(text).unwrap();
        assert_eq!(decoded.message, "counter");
        assert_eq!(decoded.data.count, 1);
        assert!(!decoded.is_internal);
    }

    #[test]
    fn missing_internal_flag_defaults_to_false() {
        let text = r#"{"message":"counter","data":null}"#;
        let decoded = decode_envelope(text).unwrap();
        assert!(!decoded.is_internal);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let text = r#"{"message":"m","data":1,"isInternal":true,"extra":"ignored"}"#;
        let decoded = decode_envelope(text).unwrap();
        assert!(decoded.is_internal);
        assert_eq!(decoded.data, json!(1));
    }

    #[test]
    fn malformed_text_fails_decode() {
        assert!(matches!(
            decode_envelope("not json at all"),
            Err(WireError::Decode(_))
        ));
        assert!(matches!(
            decode_envelope(r#"{"data": 1}"#),
            Err(WireError::Decode(_))
        ));
    }

    #[test]
    fn oversized_envelope_fails_encode() {
        let envelope = Envelope::new("big", "x".repeat(256));
        let err = encode_envelope(&envelope, 64).unwrap_err();
        assert!(matches!(
            err,
            WireError::PayloadTooLarge { size, max: 64 } if size > 64
        ));
    }

    #[test]
    fn control_constructor_sets_internal_flag() {
        let envelope = Envelope::control("removeMessage", json!("counter"));
        let text = encode_envelope(&envelope, DEFAULT_MAX_PAYLOAD).unwrap();
        let decoded = decode_envelope(&text).unwrap();
        assert!(decoded.is_internal);
        assert_eq!(decoded.data, json!("counter"));
    }
}
