//! Service layer orchestrating store mutations with the JSONL trail.
//!
//! `RedpinService` wraps `RedpinDb` (raw database access), `TrailWriter`
//! (JSONL persistence), and `SchemaRegistry` (payload validation). All repo
//! and sync methods are implemented as `impl RedpinService`.

use std::path::PathBuf;

use redpin_config::{RedpinConfig, SyncConfig};
use redpin_core::enums::{EntityKind, ReferencePolicy};
use redpin_core::trail::TrailOperation;
use redpin_schema::SchemaRegistry;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::RedpinDb;
use crate::error::DatabaseError;
use crate::helpers::count_rows;
use crate::trail::writer::TrailWriter;

/// How incoming payloads are checked and resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportPolicy {
    /// What to do when a fingerprint references a location the store lacks.
    pub missing_location: ReferencePolicy,
    /// Run JSON Schema validation before serde decoding.
    pub validate_schema: bool,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            missing_location: ReferencePolicy::Reject,
            validate_schema: true,
        }
    }
}

impl From<&SyncConfig> for ImportPolicy {
    fn from(config: &SyncConfig) -> Self {
        Self {
            missing_location: config.missing_location,
            validate_schema: config.validate_schema,
        }
    }
}

/// Row counts of the entity tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub locations: u64,
    pub fingerprints: u64,
    pub measurements: u64,
}

/// Orchestrates store mutations with the JSONL trail.
///
/// Every mutation method follows this protocol:
/// 1. Take the store lock and begin an `IMMEDIATE` transaction
/// 2. Execute SQL
/// 3. Append JSONL trail operations (file I/O) once all SQL has succeeded
/// 4. Commit, or roll back on any error
///
/// Reads take the same lock, so they never observe an open transaction.
pub struct RedpinService {
    db: RedpinDb,
    trail: TrailWriter,
    schema: SchemaRegistry,
    policy: ImportPolicy,
    // Guards the single connection: one transaction at a time, and no read
    // while a transaction is open on it.
    store_lock: Mutex<()>,
}

impl RedpinService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `trail_dir` - Directory for JSONL trail files. Pass `None` to disable
    ///   trail writing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        trail_dir: Option<PathBuf>,
    ) -> Result<Self, DatabaseError> {
        let db = RedpinDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self::from_db(db, trail))
    }

    /// Open the store described by a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn from_config(config: &RedpinConfig) -> Result<Self, DatabaseError> {
        let trail_dir = config
            .store
            .trail_enabled
            .then(|| PathBuf::from(&config.store.trail_dir));
        let service = Self::new_local(&config.store.path, trail_dir).await?;
        Ok(service.with_policy(ImportPolicy::from(&config.sync)))
    }

    /// Create from an existing `RedpinDb` with the default import policy.
    #[must_use]
    pub fn from_db(db: RedpinDb, trail: TrailWriter) -> Self {
        Self {
            db,
            trail,
            schema: SchemaRegistry::new(),
            policy: ImportPolicy::default(),
            store_lock: Mutex::new(()),
        }
    }

    /// Replace the import policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ImportPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &RedpinDb {
        &self.db
    }

    /// Access the trail writer mutably (e.g., to disable during bulk loads).
    pub const fn trail_mut(&mut self) -> &mut TrailWriter {
        &mut self.trail
    }

    /// Access the trail writer.
    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    /// Access the schema registry.
    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    #[must_use]
    pub const fn policy(&self) -> ImportPolicy {
        self.policy
    }

    /// Count stored locations, fingerprints and measurements.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a count query fails.
    pub async fn store_stats(&self) -> Result<StoreStats, DatabaseError> {
        let _guard = self.lock_reads().await;
        let conn = self.db.conn();
        Ok(StoreStats {
            locations: count_rows(conn, EntityKind::Location).await?,
            fingerprints: count_rows(conn, EntityKind::Fingerprint).await?,
            measurements: count_rows(conn, EntityKind::Measurement).await?,
        })
    }

    /// Wait until no transaction is open, and keep others out while the
    /// returned guard lives.
    pub(crate) async fn lock_reads(&self) -> MutexGuard<'_, ()> {
        self.store_lock.lock().await
    }

    /// Take the store lock and open an `IMMEDIATE` transaction.
    pub(crate) async fn begin_write(
        &self,
    ) -> Result<(MutexGuard<'_, ()>, libsql::Transaction), DatabaseError> {
        let guard = self.store_lock.lock().await;
        let tx = self.db.begin().await?;
        Ok((guard, tx))
    }

    /// Append an operation to the trail.
    pub(crate) fn record(&self, op: TrailOperation) -> Result<(), DatabaseError> {
        self.trail.append(&op)
    }
}

/// Commit `tx` if `result` is `Ok`, otherwise roll it back and return the
/// original error.
pub(crate) async fn commit_or_rollback<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use redpin_core::entities::{Fingerprint, Measurement};
    use rstest::rstest;

    use super::*;
    use crate::repos::fingerprint::save_fingerprint;
    use crate::test_support::helpers::{readings, test_service, ts};

    #[test]
    fn policy_follows_sync_config() {
        let config = SyncConfig {
            missing_location: ReferencePolicy::CreatePlaceholder,
            validate_schema: false,
        };
        let policy = ImportPolicy::from(&config);
        assert_eq!(policy.missing_location, ReferencePolicy::CreatePlaceholder);
        assert!(!policy.validate_schema);
    }

    #[tokio::test]
    async fn empty_store_has_zero_counts() {
        let svc = test_service().await;
        let stats = svc.store_stats().await.unwrap();
        assert_eq!(
            stats,
            StoreStats {
                locations: 0,
                fingerprints: 0,
                measurements: 0,
            }
        );
    }

    #[tokio::test]
    async fn from_config_opens_in_memory_store_without_trail() {
        let mut config = RedpinConfig::default();
        config.store.path = ":memory:".into();
        config.store.trail_enabled = false;
        config.sync.missing_location = ReferencePolicy::CreatePlaceholder;

        let svc = RedpinService::from_config(&config).await.unwrap();
        assert!(!svc.trail().is_enabled());
        assert_eq!(
            svc.policy().missing_location,
            ReferencePolicy::CreatePlaceholder
        );
    }

    #[tokio::test]
    async fn rollback_returns_original_error() {
        let svc = test_service().await;
        let (guard, tx) = svc.begin_write().await.unwrap();
        tx.execute("INSERT INTO locations (id, name) VALUES ('loc1', 'a')", ())
            .await
            .unwrap();
        let result: Result<(), DatabaseError> =
            commit_or_rollback(tx, Err(DatabaseError::InvalidState("boom".into()))).await;
        drop(guard);
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
        assert_eq!(svc.store_stats().await.unwrap().locations, 0);
    }

    async fn stage_fingerprint_then(svc: &RedpinService, commit: bool) {
        let (_guard, tx) = svc.begin_write().await.unwrap();
        let fp = Fingerprint::new(
            "fp1",
            Measurement::new("m1", ts(1_000), readings()).unwrap(),
            "loc1",
        )
        .unwrap();
        save_fingerprint(&tx, fp).await.unwrap();
        // Hand the runtime to the reader while the transaction is open.
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        if commit {
            tx.commit().await.unwrap();
        } else {
            tx.rollback().await.unwrap();
        }
    }

    #[rstest]
    #[case::rolled_back(false)]
    #[case::committed(true)]
    #[tokio::test]
    async fn readers_never_see_an_open_transaction(#[case] commit: bool) {
        let svc = test_service().await;
        svc.import_location(&serde_json::json!({ "id": "loc1", "name": "Lab" }))
            .await
            .unwrap();

        let reader = async {
            tokio::task::yield_now().await;
            let found = svc.get_fingerprint("fp1").await.is_ok();
            let stats = svc.store_stats().await.unwrap();
            (found, stats.fingerprints)
        };
        let ((), (found, fingerprints)) =
            tokio::join!(stage_fingerprint_then(&svc, commit), reader);

        assert_eq!(found, commit);
        assert_eq!(fingerprints, u64::from(commit));
    }
}
