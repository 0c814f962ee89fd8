//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the conversions whose SQL representation
//! differs from the Rust one: coordinate triples spread over three nullable
//! columns, millisecond timestamps, and `i32` signals stored as `INTEGER`.

use chrono::{DateTime, Utc};
use redpin_core::entities::Coordinates;
use redpin_core::enums::EntityKind;

use crate::error::DatabaseError;

/// Read three nullable REAL columns starting at `idx` as coordinates.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if only some of the three columns
/// are set.
pub fn get_coordinates(row: &libsql::Row, idx: i32) -> Result<Option<Coordinates>, DatabaseError> {
    let x = row.get::<Option<f64>>(idx)?;
    let y = row.get::<Option<f64>>(idx + 1)?;
    let z = row.get::<Option<f64>>(idx + 2)?;
    match (x, y, z) {
        (Some(x), Some(y), Some(z)) => Ok(Some(Coordinates(x, y, z))),
        (None, None, None) => Ok(None),
        _ => Err(DatabaseError::InvalidState(
            "partial coordinates stored for location".into(),
        )),
    }
}

/// Split optional coordinates into the three column values.
#[must_use]
pub const fn coordinate_columns(c: Option<Coordinates>) -> (Option<f64>, Option<f64>, Option<f64>) {
    match c {
        Some(Coordinates(x, y, z)) => (Some(x), Some(y), Some(z)),
        None => (None, None, None),
    }
}

/// Convert a stored millisecond timestamp back to `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the value is out of chrono's range.
pub fn datetime_from_millis(ms: i64) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| DatabaseError::Query(format!("timestamp {ms} ms is out of range")))
}

/// Read an INTEGER column holding an `i32` signal strength.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the stored value does not fit in `i32`.
pub fn get_signal(row: &libsql::Row, idx: i32) -> Result<i32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    i32::try_from(raw).map_err(|_| DatabaseError::Query(format!("signal {raw} out of i32 range")))
}

/// Map `EntityKind` to the corresponding SQL table name.
#[must_use]
pub const fn entity_kind_to_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Location => "locations",
        EntityKind::Measurement => "measurements",
        EntityKind::Fingerprint => "fingerprints",
    }
}

/// Count rows of an entity table.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn count_rows(conn: &libsql::Connection, kind: EntityKind) -> Result<u64, DatabaseError> {
    let table = entity_kind_to_table(kind);
    let mut rows = conn
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let count = row.get::<i64>(0)?;
    u64::try_from(count).map_err(|_| DatabaseError::Query(format!("negative count {count}")))
}
