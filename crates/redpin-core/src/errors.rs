//! Cross-cutting error types for Redpin.
//!
//! `CoreError` covers direct construction and lookups. `MarshalError` is the
//! taxonomy of the marshaling layer. Store failures are `DatabaseError` in
//! `redpin-db`, which wraps both of these.

use thiserror::Error;

use crate::enums::EntityKind;

/// Errors that can be raised by any Redpin crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: EntityKind, id: String },

    /// Data failed validation (missing relation, empty readings, etc.).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors produced while converting between entities and transport values.
#[derive(Debug, Error)]
pub enum MarshalError {
    /// The payload is structurally invalid or misses a required field.
    /// Not retriable: the payload must be rejected.
    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload { kind: EntityKind, reason: String },

    /// A referenced entity is not known to the local store. May succeed once
    /// the referenced entity has synced.
    #[error("Unresolved reference: {kind} {id} is not in the local store")]
    UnresolvedReference { kind: EntityKind, id: String },

    /// An entity could not be encoded into a transport value.
    #[error("Failed to encode {kind}: {reason}")]
    Encode { kind: EntityKind, reason: String },
}

impl MarshalError {
    /// Build a `MalformedPayload` from any displayable cause.
    pub fn malformed(kind: EntityKind, reason: impl std::fmt::Display) -> Self {
        Self::MalformedPayload {
            kind,
            reason: reason.to_string(),
        }
    }

    /// Whether the sync collaborator may retry the same payload later.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::UnresolvedReference { .. })
    }
}
