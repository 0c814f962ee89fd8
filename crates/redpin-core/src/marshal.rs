//! The marshaling capability implemented by every entity.
//!
//! `Marshal` covers the pure half of the contract: encoding an entity into a
//! transport value and decoding a value into a detached entity. Resolving
//! associated relations against the local store happens in `redpin-db`
//! (`RedpinService::import_*`), which builds on `decode` and `from_payload`.

use schemars::JsonSchema;
use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};

use crate::entities::Entity;
use crate::errors::MarshalError;

/// Conversion between an entity and its transport payload.
pub trait Marshal: Entity + Sized {
    /// The wire shape of this entity.
    type Payload: Serialize + DeserializeOwned + JsonSchema;

    /// Build the payload. Owned relations are inlined; associated relations
    /// are emitted by identifier.
    fn to_payload(&self) -> Self::Payload;

    /// Rebuild an entity from an already-decoded payload, validating the
    /// invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::MalformedPayload` on invariant violations.
    fn from_payload(payload: Self::Payload) -> Result<Self, MarshalError>;

    /// Encode into a JSON-compatible value.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::Encode` if serialization fails.
    fn to_transport(&self) -> Result<serde_json::Value, MarshalError> {
        serde_json::to_value(self.to_payload()).map_err(|e| MarshalError::Encode {
            kind: Self::KIND,
            reason: e.to_string(),
        })
    }

    /// Decode the shape of a transport value without validating invariants.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::MalformedPayload` if a required field is
    /// missing, has the wrong type, or an unknown field is present.
    fn decode(value: &serde_json::Value) -> Result<Self::Payload, MarshalError> {
        <Self::Payload as Deserialize>::deserialize(value)
            .map_err(|e| MarshalError::malformed(Self::KIND, e))
    }

    /// Decode and validate a transport value into a detached entity.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::MalformedPayload` if decoding or validation fails.
    fn from_transport(value: &serde_json::Value) -> Result<Self, MarshalError> {
        Self::from_payload(Self::decode(value)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::entities::Fingerprint;

    const EXAMPLE: &str = r#"{"id":"fp1","measurement":{"id":"m1","timestamp":1000,"readings":[{"sourceId":"ap1","signal":-55}]},"location":"loc1"}"#;

    #[test]
    fn example_payload_reserializes_equivalently() {
        let input: serde_json::Value = serde_json::from_str(EXAMPLE).unwrap();
        let fp = Fingerprint::from_transport(&input).unwrap();

        assert_eq!(fp.measurement.readings.len(), 1);
        assert_eq!(fp.location_id, "loc1");

        let output = fp.to_transport().unwrap();
        assert_eq!(output, input);
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            serde_json::to_string(&input).unwrap()
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let value = json!({
            "id": "fp1",
            "measurement": {"id": "m1", "timestamp": 1000, "readings": [{"sourceId": "ap1", "signal": -55}]},
            "location": "loc1",
            "accuracy": 3
        });
        let err = Fingerprint::decode(&value).unwrap_err();
        assert!(err.to_string().contains("accuracy"), "{err}");
    }

    #[test]
    fn wrong_location_shape_is_rejected() {
        let value = json!({
            "id": "fp1",
            "measurement": {"id": "m1", "timestamp": 1000, "readings": [{"sourceId": "ap1", "signal": -55}]},
            "location": {"id": "loc1", "name": "Office"}
        });
        assert!(matches!(
            Fingerprint::decode(&value),
            Err(MarshalError::MalformedPayload { .. })
        ));
    }
}
