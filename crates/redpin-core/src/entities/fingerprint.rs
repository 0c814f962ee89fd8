use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Entity, INITIAL_REVISION, Measurement, require_id};
use crate::enums::EntityKind;
use crate::errors::{CoreError, MarshalError};
use crate::marshal::Marshal;
use crate::transport::FingerprintPayload;

/// A (measurement, location) pair: the unit of training and matching data.
///
/// The measurement is owned and travels inline. The location is an
/// association carried by identifier; resolving it is the store's job.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Fingerprint {
    pub id: String,
    pub measurement: Measurement,
    pub location_id: String,
    pub revision: i64,
}

impl Fingerprint {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `id` or `location_id` is empty.
    pub fn new(
        id: impl Into<String>,
        measurement: Measurement,
        location_id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        let location_id = location_id.into();
        require_id(EntityKind::Fingerprint, &id).map_err(CoreError::Validation)?;
        require_id(EntityKind::Location, &location_id).map_err(CoreError::Validation)?;
        Ok(Self {
            id,
            measurement,
            location_id,
            revision: INITIAL_REVISION,
        })
    }
}

impl Entity for Fingerprint {
    const KIND: EntityKind = EntityKind::Fingerprint;

    fn id(&self) -> &str {
        &self.id
    }

    fn revision(&self) -> i64 {
        self.revision
    }
}

impl Marshal for Fingerprint {
    type Payload = FingerprintPayload;

    fn to_payload(&self) -> FingerprintPayload {
        FingerprintPayload {
            id: self.id.clone(),
            measurement: self.measurement.to_payload(),
            location: self.location_id.clone(),
        }
    }

    /// Rebuilds the fingerprint without consulting any store. The location
    /// id is carried through unresolved.
    fn from_payload(payload: FingerprintPayload) -> Result<Self, MarshalError> {
        require_id(Self::KIND, &payload.id).map_err(|e| MarshalError::malformed(Self::KIND, e))?;
        require_id(EntityKind::Location, &payload.location)
            .map_err(|e| MarshalError::malformed(Self::KIND, e))?;
        let measurement = Measurement::from_payload(payload.measurement)?;
        Ok(Self {
            id: payload.id,
            measurement,
            location_id: payload.location,
            revision: INITIAL_REVISION,
        })
    }
}
