//! # redpin-db
//!
//! libSQL local store for Redpin positioning data.
//!
//! Handles all relational state (locations, fingerprints, measurements, and
//! their readings) and the store-resolving half of the marshaling layer:
//! importing transport payloads into the store and exporting stored entities
//! back to transport values.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local embedded mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod sync;
pub mod trail;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::{Builder, TransactionBehavior};

/// An opened libSQL store with the Redpin schema applied.
///
/// One connection serves every query; [`service::RedpinService`] layers the
/// repositories and the store lock on top.
pub struct RedpinDb {
    // Dropping the database closes the connection.
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl RedpinDb {
    /// Open the store file at `path` (or `":memory:"`) and bring its schema
    /// up to date.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if libSQL cannot open the file, foreign keys
    /// cannot be enabled, or a migration fails.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Ownership of measurements and readings relies on ON DELETE CASCADE.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("enable foreign keys: {e}")))?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        tracing::debug!(path, "opened local store");
        Ok(store)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Start an `IMMEDIATE` transaction so the reads an import makes are
    /// still true when it writes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transaction cannot be started.
    pub async fn begin(&self) -> Result<libsql::Transaction, DatabaseError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        Ok(tx)
    }

    /// Mint a store-local id such as `loc-9c01e7aa` from eight random hex
    /// digits.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
