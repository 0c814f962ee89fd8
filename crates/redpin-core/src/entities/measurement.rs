use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Entity, INITIAL_REVISION, require_id};
use crate::enums::EntityKind;
use crate::errors::{CoreError, MarshalError};
use crate::marshal::Marshal;
use crate::transport::MeasurementPayload;

/// One signal observation: the emitting source and its received strength.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Reading {
    /// Identifier of the emitter (e.g. a BSSID or cell id).
    pub source_id: String,
    /// Received signal strength in dBm.
    pub signal: i32,
}

impl Reading {
    #[must_use]
    pub fn new(source_id: impl Into<String>, signal: i32) -> Self {
        Self {
            source_id: source_id.into(),
            signal,
        }
    }
}

/// A single capture of ambient signal readings. Has no lifetime of its own:
/// it exists only inside the fingerprint that owns it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Measurement {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub readings: Vec<Reading>,
}

fn validate(id: &str, readings: &[Reading]) -> Result<(), String> {
    require_id(EntityKind::Measurement, id)?;
    if readings.is_empty() {
        return Err("readings must not be empty".to_string());
    }
    if let Some(pos) = readings.iter().position(|r| r.source_id.trim().is_empty()) {
        return Err(format!("reading {pos} has an empty sourceId"));
    }
    Ok(())
}

impl Measurement {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `id` is empty, `readings` is empty,
    /// or a reading has an empty source id.
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        readings: Vec<Reading>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        validate(&id, &readings).map_err(CoreError::Validation)?;
        Ok(Self {
            id,
            timestamp,
            readings,
        })
    }
}

impl Entity for Measurement {
    const KIND: EntityKind = EntityKind::Measurement;

    fn id(&self) -> &str {
        &self.id
    }

    /// Measurements are replaced, never updated in place.
    fn revision(&self) -> i64 {
        INITIAL_REVISION
    }
}

impl Marshal for Measurement {
    type Payload = MeasurementPayload;

    fn to_payload(&self) -> MeasurementPayload {
        MeasurementPayload {
            id: self.id.clone(),
            timestamp: self.timestamp.timestamp_millis(),
            readings: self.readings.clone(),
        }
    }

    fn from_payload(payload: MeasurementPayload) -> Result<Self, MarshalError> {
        validate(&payload.id, &payload.readings)
            .map_err(|e| MarshalError::malformed(Self::KIND, e))?;
        let timestamp = DateTime::from_timestamp_millis(payload.timestamp).ok_or_else(|| {
            MarshalError::malformed(
                Self::KIND,
                format!("timestamp {} is out of range", payload.timestamp),
            )
        })?;
        Ok(Self {
            id: payload.id,
            timestamp,
            readings: payload.readings,
        })
    }
}
