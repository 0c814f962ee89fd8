//! Entity kinds, reference policies, merge outcomes, and trail operations.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Type of persisted entity, used in errors, the trail, and schema lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Location,
    Measurement,
    Fingerprint,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Measurement => "measurement",
            Self::Fingerprint => "fingerprint",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReferencePolicy
// ---------------------------------------------------------------------------

/// What to do when an associated (non-owned) relation names an entity that
/// the local store does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Fail with `MarshalError::UnresolvedReference`.
    #[default]
    Reject,
    /// Insert a placeholder entity carrying only the identifier.
    CreatePlaceholder,
}

impl ReferencePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::CreatePlaceholder => "create_placeholder",
        }
    }
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MergeOutcome
// ---------------------------------------------------------------------------

/// Result of reconciling an incoming payload with local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// No local entity existed; the payload was inserted.
    Created,
    /// A local entity existed and the payload replaced its fields.
    Updated,
    /// The local entity carried a newer modification marker and was kept.
    Kept,
}

impl MergeOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Kept => "kept",
        }
    }

    /// Whether the store was written.
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::Kept)
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the JSONL sync trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    /// Entity minted locally by a collector.
    Create,
    /// Entity materialized from an incoming transport payload.
    Import,
    Delete,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Import => "import",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::Fingerprint).unwrap();
        assert_eq!(json, "\"fingerprint\"");
        let kind: EntityKind = serde_json::from_str("\"location\"").unwrap();
        assert_eq!(kind, EntityKind::Location);
    }

    #[test]
    fn as_str_matches_serde() {
        for kind in [
            EntityKind::Location,
            EntityKind::Measurement,
            EntityKind::Fingerprint,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
        for policy in [ReferencePolicy::Reject, ReferencePolicy::CreatePlaceholder] {
            let json = serde_json::to_value(policy).unwrap();
            assert_eq!(json.as_str(), Some(policy.as_str()));
        }
        for op in [TrailOp::Create, TrailOp::Import, TrailOp::Delete] {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json.as_str(), Some(op.as_str()));
        }
    }

    #[test]
    fn reference_policy_defaults_to_reject() {
        assert_eq!(ReferencePolicy::default(), ReferencePolicy::Reject);
    }

    #[test]
    fn kept_is_not_a_write() {
        assert!(MergeOutcome::Created.is_write());
        assert!(MergeOutcome::Updated.is_write());
        assert!(!MergeOutcome::Kept.is_write());
    }
}
