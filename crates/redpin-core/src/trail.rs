//! JSONL trail operation envelope.
//!
//! Every committed mutation of the local store is recorded as a
//! `TrailOperation` in per-day `{trail_dir}/{YYYY-MM-DD}.jsonl` files, giving
//! the sync collaborator an ordered record of what was created, imported, or
//! deleted.
//!
//! Old trail lines without a `v` field deserialize with `v == 1` via
//! `#[serde(default)]`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, TrailOp};

/// Current trail envelope version.
pub const TRAIL_VERSION: u32 = 1;

const fn default_trail_version() -> u32 {
    TRAIL_VERSION
}

/// A single operation recorded in the JSONL trail.
///
/// `data` holds the transport value for `Create` and `Import` ops, and an
/// empty object for `Delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    /// Envelope version. Defaults to 1 for trails without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// When the operation was committed.
    pub ts: DateTime<Utc>,

    pub op: TrailOp,

    pub entity: EntityKind,

    /// ID of the affected entity.
    pub id: String,

    pub data: serde_json::Value,
}

impl TrailOperation {
    /// Build an envelope stamped with the current time.
    #[must_use]
    pub fn now(op: TrailOp, entity: EntityKind, id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            v: TRAIL_VERSION,
            ts: Utc::now(),
            op,
            entity,
            id: id.into(),
            data,
        }
    }
}
