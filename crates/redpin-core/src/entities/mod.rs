//! Entity structs for the Redpin data model.
//!
//! Each entity maps to a table in the libSQL database. Relations are explicit:
//! a `Fingerprint` owns its `Measurement` by value and refers to its
//! `Location` by identifier only.

mod fingerprint;
mod location;
mod measurement;

pub use fingerprint::Fingerprint;
pub use location::{Coordinates, Location};
pub use measurement::{Measurement, Reading};

use crate::enums::EntityKind;

/// Revision assigned to an entity when it is first created.
pub const INITIAL_REVISION: i64 = 1;

/// Base contract for every persisted, identity-bearing entity.
pub trait Entity {
    const KIND: EntityKind;

    /// Stable identifier, unique within the store.
    fn id(&self) -> &str;

    /// Modification marker. Higher values are newer.
    fn revision(&self) -> i64;
}

/// Reject empty identifiers.
pub(crate) fn require_id(kind: EntityKind, id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err(format!("{kind} id must not be empty"));
    }
    Ok(())
}
