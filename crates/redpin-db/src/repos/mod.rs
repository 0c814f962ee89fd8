//! Entity repositories.
//!
//! Each module holds the connection-level SQL for one table family plus the
//! `impl RedpinService` methods built on it. The connection-level functions
//! take `&libsql::Connection` so they run unchanged inside a transaction.

pub mod fingerprint;
pub mod location;
pub mod measurement;

use redpin_core::enums::EntityKind;
use redpin_core::errors::CoreError;

use crate::error::DatabaseError;

pub(crate) fn not_found(entity_type: EntityKind, id: &str) -> DatabaseError {
    DatabaseError::Core(CoreError::NotFound {
        entity_type,
        id: id.to_string(),
    })
}
