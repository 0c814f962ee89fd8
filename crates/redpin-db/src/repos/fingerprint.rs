//! Fingerprint repository.
//!
//! A fingerprint row owns one measurement row (and its readings) and points
//! at one location row. `save_fingerprint` is the single write path used by
//! both the collector (`create_fingerprint`) and sync (`import_fingerprint`).

use chrono::{DateTime, Utc};

use redpin_core::entities::{Fingerprint, Measurement, Reading};
use redpin_core::enums::{EntityKind, MergeOutcome, ReferencePolicy, TrailOp};
use redpin_core::ids::{PREFIX_FINGERPRINT, PREFIX_MEASUREMENT};
use redpin_core::marshal::Marshal;
use redpin_core::trail::TrailOperation;

use super::location::fetch_location;
use super::measurement::{delete_measurement_of, fetch_measurement_of, insert_measurement};
use super::not_found;
use crate::error::DatabaseError;
use crate::service::{RedpinService, commit_or_rollback};

struct FingerprintRow {
    location_id: String,
    revision: i64,
}

async fn fetch_fingerprint_row(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<FingerprintRow>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT location_id, revision FROM fingerprints WHERE id = ?1",
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(FingerprintRow {
            location_id: row.get::<String>(0)?,
            revision: row.get::<i64>(1)?,
        })),
        None => Ok(None),
    }
}

pub(crate) async fn fetch_fingerprint(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Fingerprint>, DatabaseError> {
    let Some(row) = fetch_fingerprint_row(conn, id).await? else {
        return Ok(None);
    };
    let measurement = fetch_measurement_of(conn, id).await?;
    Ok(Some(Fingerprint {
        id: id.to_string(),
        measurement,
        location_id: row.location_id,
        revision: row.revision,
    }))
}

async fn fetch_fingerprints(
    conn: &libsql::Connection,
    ids: Vec<String>,
) -> Result<Vec<Fingerprint>, DatabaseError> {
    let mut fingerprints = Vec::with_capacity(ids.len());
    for id in ids {
        let fp = fetch_fingerprint(conn, &id)
            .await?
            .ok_or_else(|| not_found(EntityKind::Fingerprint, &id))?;
        fingerprints.push(fp);
    }
    Ok(fingerprints)
}

async fn collect_ids(mut rows: libsql::Rows) -> Result<Vec<String>, DatabaseError> {
    let mut ids = Vec::new();
    while let Some(row) = rows.next().await? {
        ids.push(row.get::<String>(0)?);
    }
    Ok(ids)
}

/// Insert a new fingerprint, or replace the measurement and location link of
/// an existing one and bump its revision.
///
/// The referenced location must already be stored.
pub(crate) async fn save_fingerprint(
    conn: &libsql::Connection,
    mut fingerprint: Fingerprint,
) -> Result<(Fingerprint, MergeOutcome), DatabaseError> {
    match fetch_fingerprint_row(conn, &fingerprint.id).await? {
        None => {
            conn.execute(
                "INSERT INTO fingerprints (id, location_id, revision) VALUES (?1, ?2, ?3)",
                libsql::params![
                    fingerprint.id.as_str(),
                    fingerprint.location_id.as_str(),
                    fingerprint.revision
                ],
            )
            .await?;
            insert_measurement(conn, &fingerprint.id, &fingerprint.measurement).await?;
            Ok((fingerprint, MergeOutcome::Created))
        }
        Some(existing) => {
            fingerprint.revision = existing.revision + 1;
            delete_measurement_of(conn, &fingerprint.id).await?;
            insert_measurement(conn, &fingerprint.id, &fingerprint.measurement).await?;
            conn.execute(
                "UPDATE fingerprints
                 SET location_id = ?2, revision = ?3, updated_at = datetime('now')
                 WHERE id = ?1",
                libsql::params![
                    fingerprint.id.as_str(),
                    fingerprint.location_id.as_str(),
                    fingerprint.revision
                ],
            )
            .await?;
            if existing.location_id != fingerprint.location_id {
                tracing::debug!(
                    id = %fingerprint.id,
                    from = %existing.location_id,
                    to = %fingerprint.location_id,
                    "fingerprint moved to another location"
                );
            }
            Ok((fingerprint, MergeOutcome::Updated))
        }
    }
}

impl RedpinService {
    /// Look up a fingerprint with its measurement.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no such fingerprint is stored.
    pub async fn get_fingerprint(&self, id: &str) -> Result<Fingerprint, DatabaseError> {
        let _guard = self.lock_reads().await;
        fetch_fingerprint(self.db().conn(), id)
            .await?
            .ok_or_else(|| not_found(EntityKind::Fingerprint, id))
    }

    /// List fingerprints ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn list_fingerprints(&self, limit: u32) -> Result<Vec<Fingerprint>, DatabaseError> {
        let _guard = self.lock_reads().await;
        let conn = self.db().conn();
        let rows = conn
            .query(
                "SELECT id FROM fingerprints ORDER BY id LIMIT ?1",
                [i64::from(limit)],
            )
            .await?;
        let ids = collect_ids(rows).await?;
        fetch_fingerprints(conn, ids).await
    }

    /// All fingerprints taken at one location.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the location is unknown.
    pub async fn list_fingerprints_at_location(
        &self,
        location_id: &str,
    ) -> Result<Vec<Fingerprint>, DatabaseError> {
        let _guard = self.lock_reads().await;
        let conn = self.db().conn();
        if fetch_location(conn, location_id).await?.is_none() {
            return Err(not_found(EntityKind::Location, location_id));
        }
        let rows = conn
            .query(
                "SELECT id FROM fingerprints WHERE location_id = ?1 ORDER BY id",
                [location_id],
            )
            .await?;
        let ids = collect_ids(rows).await?;
        fetch_fingerprints(conn, ids).await
    }

    /// Record a fingerprint captured locally at a stored location.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` (wrapped) for empty readings,
    /// `MarshalError::UnresolvedReference` (wrapped) if the location is not
    /// stored, or `DatabaseError` if a write fails.
    pub async fn create_fingerprint(
        &self,
        location_id: &str,
        timestamp: DateTime<Utc>,
        readings: Vec<Reading>,
    ) -> Result<Fingerprint, DatabaseError> {
        let measurement_id = self.db().generate_id(PREFIX_MEASUREMENT).await?;
        let measurement = Measurement::new(measurement_id, timestamp, readings)?;
        let id = self.db().generate_id(PREFIX_FINGERPRINT).await?;
        let fingerprint = Fingerprint::new(id, measurement, location_id)?;

        let (_guard, tx) = self.begin_write().await?;
        let result: Result<Fingerprint, DatabaseError> = async {
            Self::resolve_location(&tx, location_id, ReferencePolicy::Reject).await?;
            let (stored, _) = save_fingerprint(&tx, fingerprint).await?;
            self.record(TrailOperation::now(
                TrailOp::Create,
                EntityKind::Fingerprint,
                &stored.id,
                stored.to_transport()?,
            ))?;
            Ok(stored)
        }
        .await;
        let stored = commit_or_rollback(tx, result).await?;

        tracing::info!(id = %stored.id, location = location_id, "created fingerprint");
        Ok(stored)
    }

    /// Delete a fingerprint together with its measurement and readings. The
    /// location is kept.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the fingerprint is unknown.
    pub async fn delete_fingerprint(&self, id: &str) -> Result<(), DatabaseError> {
        let (_guard, tx) = self.begin_write().await?;
        let result = async {
            let changed = tx
                .execute("DELETE FROM fingerprints WHERE id = ?1", [id])
                .await?;
            if changed == 0 {
                return Err(not_found(EntityKind::Fingerprint, id));
            }
            self.record(TrailOperation::now(
                TrailOp::Delete,
                EntityKind::Fingerprint,
                id,
                serde_json::json!({}),
            ))
        }
        .await;
        commit_or_rollback(tx, result).await?;

        tracing::info!(id, "deleted fingerprint");
        Ok(())
    }
}
