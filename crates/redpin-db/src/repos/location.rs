//! Location repository: shared places referenced by fingerprints.

use redpin_core::entities::{Coordinates, Location};
use redpin_core::enums::{EntityKind, TrailOp};
use redpin_core::ids::PREFIX_LOCATION;
use redpin_core::marshal::Marshal;
use redpin_core::trail::TrailOperation;

use super::not_found;
use crate::error::DatabaseError;
use crate::helpers::{coordinate_columns, get_coordinates};
use crate::service::{RedpinService, commit_or_rollback};

const SELECT_LOCATION: &str = "SELECT id, name, x, y, z, revision FROM locations";

fn row_to_location(row: &libsql::Row) -> Result<Location, DatabaseError> {
    Ok(Location {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        coordinates: get_coordinates(row, 2)?,
        revision: row.get::<i64>(5)?,
    })
}

pub(crate) async fn fetch_location(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Location>, DatabaseError> {
    let mut rows = conn
        .query(&format!("{SELECT_LOCATION} WHERE id = ?1"), [id])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_location(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn insert_location(
    conn: &libsql::Connection,
    location: &Location,
) -> Result<(), DatabaseError> {
    let (x, y, z) = coordinate_columns(location.coordinates);
    conn.execute(
        "INSERT INTO locations (id, name, x, y, z, revision) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            location.id.as_str(),
            location.name.as_str(),
            x,
            y,
            z,
            location.revision
        ],
    )
    .await?;
    Ok(())
}

/// Overwrite every mergeable field of an existing location.
pub(crate) async fn replace_location(
    conn: &libsql::Connection,
    location: &Location,
) -> Result<(), DatabaseError> {
    let (x, y, z) = coordinate_columns(location.coordinates);
    let changed = conn
        .execute(
            "UPDATE locations
             SET name = ?2, x = ?3, y = ?4, z = ?5, revision = ?6, updated_at = datetime('now')
             WHERE id = ?1",
            libsql::params![
                location.id.as_str(),
                location.name.as_str(),
                x,
                y,
                z,
                location.revision
            ],
        )
        .await?;
    if changed == 0 {
        return Err(not_found(EntityKind::Location, &location.id));
    }
    Ok(())
}

pub(crate) async fn count_fingerprints_at(
    conn: &libsql::Connection,
    location_id: &str,
) -> Result<u64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM fingerprints WHERE location_id = ?1",
            [location_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let count = row.get::<i64>(0)?;
    u64::try_from(count).map_err(|_| DatabaseError::Query(format!("negative count {count}")))
}

impl RedpinService {
    /// Look up a location by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if no such location is stored.
    pub async fn get_location(&self, id: &str) -> Result<Location, DatabaseError> {
        let _guard = self.lock_reads().await;
        fetch_location(self.db().conn(), id)
            .await?
            .ok_or_else(|| not_found(EntityKind::Location, id))
    }

    /// List locations ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_locations(&self, limit: u32) -> Result<Vec<Location>, DatabaseError> {
        let _guard = self.lock_reads().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("{SELECT_LOCATION} ORDER BY id LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;
        let mut locations = Vec::new();
        while let Some(row) = rows.next().await? {
            locations.push(row_to_location(&row)?);
        }
        Ok(locations)
    }

    /// Create a location with a locally minted id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert or the trail append fails.
    pub async fn create_location(
        &self,
        name: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<Location, DatabaseError> {
        let id = self.db().generate_id(PREFIX_LOCATION).await?;
        let location = Location::new(id, name, coordinates)?;

        let (_guard, tx) = self.begin_write().await?;
        let result = async {
            insert_location(&tx, &location).await?;
            self.record(TrailOperation::now(
                TrailOp::Create,
                EntityKind::Location,
                &location.id,
                location.to_transport()?,
            ))
        }
        .await;
        commit_or_rollback(tx, result).await?;

        tracing::info!(id = %location.id, name, "created location");
        Ok(location)
    }

    /// Delete a location no fingerprint references.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the location is unknown, or
    /// `DatabaseError::InvalidState` while fingerprints still reference it.
    pub async fn delete_location(&self, id: &str) -> Result<(), DatabaseError> {
        let (_guard, tx) = self.begin_write().await?;
        let result = async {
            if fetch_location(&tx, id).await?.is_none() {
                return Err(not_found(EntityKind::Location, id));
            }
            let referencing = count_fingerprints_at(&tx, id).await?;
            if referencing > 0 {
                return Err(DatabaseError::InvalidState(format!(
                    "location {id} is referenced by {referencing} fingerprint(s)"
                )));
            }
            tx.execute("DELETE FROM locations WHERE id = ?1", [id])
                .await?;
            self.record(TrailOperation::now(
                TrailOp::Delete,
                EntityKind::Location,
                id,
                serde_json::json!({}),
            ))
        }
        .await;
        commit_or_rollback(tx, result).await?;

        tracing::info!(id, "deleted location");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use redpin_core::errors::CoreError;

    use super::*;
    use crate::test_support::helpers::{readings, seed_location, test_service, ts};

    #[tokio::test]
    async fn create_and_get_location() {
        let svc = test_service().await;
        let created = svc
            .create_location("Office 42", Some(Coordinates(10.0, 20.0, 1.0)))
            .await
            .unwrap();
        assert!(created.id.starts_with("loc-"));
        assert_eq!(created.revision, 1);

        let fetched = svc.get_location(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn location_without_coordinates_roundtrips() {
        let svc = test_service().await;
        let created = svc.create_location("Hallway", None).await.unwrap();
        let fetched = svc.get_location(&created.id).await.unwrap();
        assert_eq!(fetched.coordinates, None);
    }

    #[tokio::test]
    async fn get_missing_location_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_location("nope").await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Core(CoreError::NotFound {
                entity_type: EntityKind::Location,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn list_locations_respects_limit() {
        let svc = test_service().await;
        for name in ["a", "b", "c"] {
            seed_location(&svc, name).await;
        }
        assert_eq!(svc.list_locations(2).await.unwrap().len(), 2);
        assert_eq!(svc.list_locations(50).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn replace_location_overwrites_fields() {
        let svc = test_service().await;
        let mut loc = seed_location(&svc, "Old").await;
        loc.name = "New".into();
        loc.coordinates = None;
        loc.revision = 7;
        replace_location(svc.db().conn(), &loc).await.unwrap();
        assert_eq!(svc.get_location(&loc.id).await.unwrap(), loc);
    }

    #[tokio::test]
    async fn delete_unreferenced_location() {
        let svc = test_service().await;
        let loc = seed_location(&svc, "Lab").await;
        svc.delete_location(&loc.id).await.unwrap();
        assert!(svc.get_location(&loc.id).await.is_err());
    }

    #[tokio::test]
    async fn delete_referenced_location_fails() {
        let svc = test_service().await;
        let loc = seed_location(&svc, "Lab").await;
        svc.create_fingerprint(&loc.id, ts(1_000), readings())
            .await
            .unwrap();

        let err = svc.delete_location(&loc.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
        assert!(svc.get_location(&loc.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_missing_location_is_not_found() {
        let svc = test_service().await;
        let err = svc.delete_location("ghost").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::NotFound { .. })));
    }
}
