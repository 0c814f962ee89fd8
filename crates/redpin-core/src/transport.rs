//! Transport payloads exchanged with the remote store.
//!
//! These are the JSON shapes produced by `Marshal::to_transport` and accepted
//! by `Marshal::decode`. Every payload rejects unknown fields so that nothing
//! the receiver cannot interpret is silently dropped.
//!
//! ```text
//! fingerprint  { "id", "measurement": { .. inline .. }, "location": "<location id>" }
//! measurement  { "id", "timestamp": <ms since epoch>, "readings": [ { "sourceId", "signal" } ] }
//! location     { "id", "name", "coordinates"?: [x, y, z], "modified"?: <revision> }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Reading};

/// Wire form of a `Location`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LocationPayload {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Modification marker used for last-write-wins. Absent when the sender
    /// does not track revisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<i64>,
}

/// Wire form of a `Measurement`. Always embedded in its fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MeasurementPayload {
    pub id: String,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub readings: Vec<Reading>,
}

/// Wire form of a `Fingerprint`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FingerprintPayload {
    pub id: String,
    pub measurement: MeasurementPayload,
    /// Identifier of the associated location.
    pub location: String,
}
