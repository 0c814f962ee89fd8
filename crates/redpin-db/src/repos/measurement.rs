//! Measurement repository.
//!
//! A measurement belongs to exactly one fingerprint and is never written on
//! its own: `insert_measurement` and `delete_measurement_of` are called from
//! the fingerprint paths inside their transaction.

use redpin_core::entities::{Measurement, Reading};
use redpin_core::enums::EntityKind;

use super::not_found;
use crate::error::DatabaseError;
use crate::helpers::{datetime_from_millis, get_signal};
use crate::service::RedpinService;

async fn fetch_readings(
    conn: &libsql::Connection,
    measurement_id: &str,
) -> Result<Vec<Reading>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT source_id, signal FROM readings WHERE measurement_id = ?1 ORDER BY position",
            [measurement_id],
        )
        .await?;
    let mut readings = Vec::new();
    while let Some(row) = rows.next().await? {
        readings.push(Reading {
            source_id: row.get::<String>(0)?,
            signal: get_signal(&row, 1)?,
        });
    }
    Ok(readings)
}

async fn row_to_measurement(
    conn: &libsql::Connection,
    row: &libsql::Row,
) -> Result<Measurement, DatabaseError> {
    let id = row.get::<String>(0)?;
    let timestamp = datetime_from_millis(row.get::<i64>(1)?)?;
    let readings = fetch_readings(conn, &id).await?;
    if readings.is_empty() {
        return Err(DatabaseError::InvalidState(format!(
            "measurement {id} has no readings"
        )));
    }
    Ok(Measurement {
        id,
        timestamp,
        readings,
    })
}

/// The measurement owned by `fingerprint_id`.
pub(crate) async fn fetch_measurement_of(
    conn: &libsql::Connection,
    fingerprint_id: &str,
) -> Result<Measurement, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, captured_at_ms FROM measurements WHERE fingerprint_id = ?1",
            [fingerprint_id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| {
        DatabaseError::InvalidState(format!("fingerprint {fingerprint_id} has no measurement"))
    })?;
    row_to_measurement(conn, &row).await
}

pub(crate) async fn insert_measurement(
    conn: &libsql::Connection,
    fingerprint_id: &str,
    measurement: &Measurement,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO measurements (id, fingerprint_id, captured_at_ms) VALUES (?1, ?2, ?3)",
        libsql::params![
            measurement.id.as_str(),
            fingerprint_id,
            measurement.timestamp.timestamp_millis()
        ],
    )
    .await?;

    for (position, reading) in measurement.readings.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| DatabaseError::Query(format!("reading position {position} overflows")))?;
        conn.execute(
            "INSERT INTO readings (measurement_id, position, source_id, signal)
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                measurement.id.as_str(),
                position,
                reading.source_id.as_str(),
                reading.signal
            ],
        )
        .await?;
    }
    Ok(())
}

/// Delete the measurement of `fingerprint_id`. Its readings cascade.
pub(crate) async fn delete_measurement_of(
    conn: &libsql::Connection,
    fingerprint_id: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM measurements WHERE fingerprint_id = ?1",
        [fingerprint_id],
    )
    .await?;
    Ok(())
}

impl RedpinService {
    /// Look up a measurement by its own id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no such measurement is stored.
    pub async fn get_measurement(&self, id: &str) -> Result<Measurement, DatabaseError> {
        let _guard = self.lock_reads().await;
        let conn = self.db().conn();
        let mut rows = conn
            .query(
                "SELECT id, captured_at_ms FROM measurements WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| not_found(EntityKind::Measurement, id))?;
        row_to_measurement(conn, &row).await
    }
}
