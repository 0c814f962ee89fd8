//! Named JSON Schemas for everything Redpin writes to the wire or the trail.

use std::collections::BTreeMap;

use redpin_core::entities::Reading;
use redpin_core::enums::EntityKind;
use redpin_core::trail::TrailOperation;
use redpin_core::transport::{FingerprintPayload, LocationPayload, MeasurementPayload};
use jsonschema::Validator;
use schemars::{Schema, schema_for};
use serde_json::Value;

use crate::error::SchemaError;

/// Registry name of the transport payload for an entity kind.
#[must_use]
pub const fn payload_schema_name(kind: EntityKind) -> &'static str {
    kind.as_str()
}

const TRAIL_OPERATION: &str = "trail_operation";

fn generators() -> [(&'static str, fn() -> Schema); 5] {
    [
        (payload_schema_name(EntityKind::Location), || schema_for!(LocationPayload)),
        (payload_schema_name(EntityKind::Measurement), || schema_for!(MeasurementPayload)),
        (payload_schema_name(EntityKind::Fingerprint), || schema_for!(FingerprintPayload)),
        ("reading", || schema_for!(Reading)),
        (TRAIL_OPERATION, || schema_for!(TrailOperation)),
    ]
}

struct Entry {
    schema: Value,
    /// Compiled once; a schema that fails to compile keeps the reason.
    validator: Result<Validator, String>,
}

/// Schemas generated from the `redpin-core` payload types, keyed by name.
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, Entry>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        let schemas = generators()
            .into_iter()
            .map(|(name, generate)| {
                let schema = generate().to_value();
                let validator = jsonschema::validator_for(&schema).map_err(|e| e.to_string());
                (name, Entry { schema, validator })
            })
            .collect();
        Self { schemas }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name).map(|entry| &entry.schema)
    }

    /// Check `instance` against the schema registered as `name`, collecting
    /// every violation rather than stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for an unknown name,
    /// `SchemaError::Uncompilable` if the schema cannot be compiled, and
    /// `SchemaError::ValidationFailed` if the instance violates it.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<(), SchemaError> {
        let entry = self
            .schemas
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        let validator = entry
            .validator
            .as_ref()
            .map_err(|reason| SchemaError::Uncompilable {
                name: name.to_string(),
                reason: reason.clone(),
            })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// [`Self::validate`] against the transport payload of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` if the payload violates the schema.
    pub fn validate_payload(&self, kind: EntityKind, instance: &Value) -> Result<(), SchemaError> {
        self.validate(payload_schema_name(kind), instance)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        self.schemas.keys().copied().collect()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
