//! Database error types for redpin-db.
//!
//! `DatabaseError` is the store-failure class of the marshaling taxonomy. It
//! also carries `MarshalError` and `CoreError` unchanged so that callers can
//! tell a rejected payload from a broken store.

use redpin_core::errors::{CoreError, MarshalError};
use thiserror::Error;

/// Everything a store call can fail with.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned data of the wrong shape.
    #[error("store query failed: {0}")]
    Query(String),

    /// Opening the store could not bring its tables up to date.
    #[error("store migration failed: {0}")]
    Migration(String),

    /// A query guaranteed to yield a row yielded none.
    #[error("store query returned no row")]
    NoResult,

    /// The request conflicts with stored data, such as deleting a location
    /// fingerprints still point at.
    #[error("store state conflict: {0}")]
    InvalidState(String),

    #[error("libsql: {0}")]
    LibSql(#[from] libsql::Error),

    /// The payload was rejected by the marshaling layer.
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// Direct construction or lookup failed validation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Trail I/O and other failures outside SQL.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether the sync collaborator may retry the same operation later.
    ///
    /// Only unresolved references qualify: the referenced entity may arrive
    /// in a later sync. Everything else is either a bad payload or a store
    /// failure the caller must surface.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        match self {
            Self::Marshal(e) => e.is_retriable(),
            _ => false,
        }
    }

    /// The marshaling error, if this is one.
    #[must_use]
    pub const fn as_marshal(&self) -> Option<&MarshalError> {
        match self {
            Self::Marshal(e) => Some(e),
            _ => None,
        }
    }
}
