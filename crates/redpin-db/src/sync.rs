//! Store-resolving marshaling: importing transport values into the local
//! store and exporting stored entities back out.
//!
//! Each import runs in one `IMMEDIATE` transaction. A fingerprint row, its
//! fresh measurement and readings, the location link and any placeholder
//! location are committed together or not at all.

use redpin_core::entities::{Entity, Fingerprint, INITIAL_REVISION, Location};
use redpin_core::enums::{EntityKind, MergeOutcome, ReferencePolicy, TrailOp};
use redpin_core::errors::MarshalError;
use redpin_core::marshal::Marshal;
use redpin_core::trail::TrailOperation;
use redpin_core::transport::LocationPayload;
use redpin_schema::SchemaError;
use serde::Serialize;

use crate::error::DatabaseError;
use crate::repos::fingerprint::save_fingerprint;
use crate::repos::location::{fetch_location, insert_location, replace_location};
use crate::service::{RedpinService, commit_or_rollback};

/// A stored entity together with what the import did to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Imported<T> {
    pub entity: T,
    pub outcome: MergeOutcome,
}

/// Per-payload result of [`RedpinService::import_batch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItemOutcome {
    /// The payload was committed.
    Imported { id: String, outcome: MergeOutcome },
    /// The payload is malformed and must not be resent unchanged.
    Rejected { reason: String },
    /// A referenced entity is missing locally. Retry after it syncs.
    Deferred { kind: EntityKind, id: String },
    /// The store failed while applying the payload.
    Failed { reason: String },
}

impl BatchItemOutcome {
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Deferred { .. })
    }
}

impl<T: Entity> From<Result<Imported<T>, DatabaseError>> for BatchItemOutcome {
    fn from(result: Result<Imported<T>, DatabaseError>) -> Self {
        match result {
            Ok(imported) => Self::Imported {
                id: imported.entity.id().to_string(),
                outcome: imported.outcome,
            },
            Err(DatabaseError::Marshal(MarshalError::UnresolvedReference { kind, id })) => {
                Self::Deferred { kind, id }
            }
            Err(DatabaseError::Marshal(e)) => Self::Rejected {
                reason: e.to_string(),
            },
            Err(e) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }
}

fn log_failed_import(kind: EntityKind, err: &DatabaseError) {
    if err.as_marshal().is_some() {
        tracing::warn!(%kind, error = %err, retriable = err.is_retriable(), "payload rejected");
    } else {
        tracing::warn!(%kind, error = %err, "import failed in store");
    }
}

impl RedpinService {
    /// Run JSON Schema validation when the policy asks for it.
    fn check_schema(&self, kind: EntityKind, value: &serde_json::Value) -> Result<(), DatabaseError> {
        if !self.policy().validate_schema {
            return Ok(());
        }
        match self.schema().validate_payload(kind, value) {
            Ok(()) => Ok(()),
            Err(SchemaError::ValidationFailed { errors }) => {
                Err(MarshalError::malformed(kind, errors.join("; ")).into())
            }
            Err(e) => Err(DatabaseError::Other(e.into())),
        }
    }

    /// Find the location a fingerprint points at, applying `policy` when it
    /// is missing.
    ///
    /// An inserted placeholder comes back with its trail operation, which the
    /// caller records only once the rest of the transaction has succeeded.
    pub(crate) async fn resolve_location(
        conn: &libsql::Connection,
        id: &str,
        policy: ReferencePolicy,
    ) -> Result<(Location, Option<TrailOperation>), DatabaseError> {
        if let Some(location) = fetch_location(conn, id).await? {
            return Ok((location, None));
        }
        match policy {
            ReferencePolicy::Reject => Err(MarshalError::UnresolvedReference {
                kind: EntityKind::Location,
                id: id.to_string(),
            }
            .into()),
            ReferencePolicy::CreatePlaceholder => {
                let placeholder = Location::placeholder(id);
                insert_location(conn, &placeholder).await?;
                let pending = TrailOperation::now(
                    TrailOp::Import,
                    EntityKind::Location,
                    id,
                    placeholder.to_transport()?,
                );
                Ok((placeholder, Some(pending)))
            }
        }
    }

    /// Last-write-wins merge of an incoming location on its revision marker.
    async fn merge_location(
        &self,
        conn: &libsql::Connection,
        payload: LocationPayload,
    ) -> Result<Imported<Location>, DatabaseError> {
        let marker = payload.modified;
        let mut incoming = Location::from_payload(payload)?;

        let outcome = match fetch_location(conn, &incoming.id).await? {
            None => {
                insert_location(conn, &incoming).await?;
                MergeOutcome::Created
            }
            Some(local) => match marker {
                Some(m) if m < local.revision => {
                    tracing::debug!(id = %local.id, local = local.revision, incoming = m, "kept newer local location");
                    return Ok(Imported {
                        entity: local,
                        outcome: MergeOutcome::Kept,
                    });
                }
                Some(_) => {
                    replace_location(conn, &incoming).await?;
                    MergeOutcome::Updated
                }
                None => {
                    incoming.revision = local.revision.max(INITIAL_REVISION);
                    replace_location(conn, &incoming).await?;
                    MergeOutcome::Updated
                }
            },
        };

        self.record(TrailOperation::now(
            TrailOp::Import,
            EntityKind::Location,
            &incoming.id,
            incoming.to_transport()?,
        ))?;
        Ok(Imported {
            entity: incoming,
            outcome,
        })
    }

    /// Import a location transport value, merging with any stored copy.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::MalformedPayload` (wrapped) if the value is not
    /// a valid location payload, or `DatabaseError` if the store fails.
    pub async fn import_location(
        &self,
        value: &serde_json::Value,
    ) -> Result<Imported<Location>, DatabaseError> {
        let result = async {
            self.check_schema(EntityKind::Location, value)?;
            let payload = Location::decode(value)?;
            tracing::debug!(id = %payload.id, "importing location");

            let (_guard, tx) = self.begin_write().await?;
            let merged = self.merge_location(&tx, payload).await;
            commit_or_rollback(tx, merged).await
        }
        .await;

        match &result {
            Ok(imported) if imported.outcome == MergeOutcome::Created => {
                tracing::info!(id = %imported.entity.id, "imported new location");
            }
            Ok(_) => {}
            Err(e) => log_failed_import(EntityKind::Location, e),
        }
        result
    }

    /// Import a fingerprint transport value.
    ///
    /// The measurement is always rebuilt from the payload. An existing
    /// fingerprint with the same id has its measurement replaced wholesale,
    /// its location link updated and its revision incremented.
    ///
    /// # Errors
    ///
    /// Returns `MarshalError::MalformedPayload` (wrapped) for invalid values,
    /// `MarshalError::UnresolvedReference` (wrapped) for an unknown location
    /// under `ReferencePolicy::Reject`, or `DatabaseError` if the store
    /// fails. Nothing is written on error.
    pub async fn import_fingerprint(
        &self,
        value: &serde_json::Value,
    ) -> Result<Imported<Fingerprint>, DatabaseError> {
        let result = async {
            self.check_schema(EntityKind::Fingerprint, value)?;
            let detached = Fingerprint::from_transport(value)?;
            tracing::debug!(id = %detached.id, location = %detached.location_id, "importing fingerprint");

            let (_guard, tx) = self.begin_write().await?;
            let applied: Result<Imported<Fingerprint>, DatabaseError> = async {
                let (_, placeholder) = Self::resolve_location(
                    &tx,
                    &detached.location_id,
                    self.policy().missing_location,
                )
                .await?;
                let (stored, outcome) = save_fingerprint(&tx, detached).await?;

                // Every SQL step succeeded; only now does anything reach the trail.
                let fingerprint_op = TrailOperation::now(
                    TrailOp::Import,
                    EntityKind::Fingerprint,
                    &stored.id,
                    stored.to_transport()?,
                );
                if let Some(op) = placeholder {
                    self.record(op)?;
                    tracing::info!(id = %stored.location_id, "created placeholder location");
                }
                self.record(fingerprint_op)?;
                Ok(Imported {
                    entity: stored,
                    outcome,
                })
            }
            .await;
            commit_or_rollback(tx, applied).await
        }
        .await;

        match &result {
            Ok(imported) => tracing::info!(
                id = %imported.entity.id,
                outcome = %imported.outcome,
                "imported fingerprint"
            ),
            Err(e) => log_failed_import(EntityKind::Fingerprint, e),
        }
        result
    }

    /// Import fingerprint payloads one at a time. Each payload is atomic on
    /// its own; a failed payload does not affect the others.
    pub async fn import_batch(&self, values: &[serde_json::Value]) -> Vec<BatchItemOutcome> {
        let mut outcomes = Vec::with_capacity(values.len());
        for value in values {
            outcomes.push(BatchItemOutcome::from(self.import_fingerprint(value).await));
        }

        let imported = outcomes
            .iter()
            .filter(|o| matches!(o, BatchItemOutcome::Imported { .. }))
            .count();
        let deferred = outcomes.iter().filter(|o| o.is_retriable()).count();
        tracing::info!(
            total = values.len(),
            imported,
            deferred,
            failed = values.len() - imported - deferred,
            "batch import finished"
        );
        outcomes
    }

    /// Transport value of a stored location.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the location is unknown.
    pub async fn export_location(&self, id: &str) -> Result<serde_json::Value, DatabaseError> {
        let location = self.get_location(id).await?;
        tracing::debug!(id, "exporting location");
        Ok(location.to_transport()?)
    }

    /// Transport value of a stored fingerprint, measurement inline.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) if the fingerprint is unknown.
    pub async fn export_fingerprint(&self, id: &str) -> Result<serde_json::Value, DatabaseError> {
        let fingerprint = self.get_fingerprint(id).await?;
        tracing::debug!(id, "exporting fingerprint");
        Ok(fingerprint.to_transport()?)
    }
}
