use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Entity, INITIAL_REVISION, require_id};
use crate::enums::EntityKind;
use crate::errors::{CoreError, MarshalError};
use crate::marshal::Marshal;
use crate::transport::LocationPayload;

/// Position of a location on its map, serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Coordinates(pub f64, pub f64, pub f64);

/// A named or coordinate-identified place. Shared by any number of
/// fingerprints and persisted independently of them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub revision: i64,
}

impl Location {
    /// Create a location at its initial revision.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `id` is empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinates: Option<Coordinates>,
    ) -> Result<Self, CoreError> {
        let id = id.into();
        require_id(EntityKind::Location, &id).map_err(CoreError::Validation)?;
        Ok(Self {
            id,
            name: name.into(),
            coordinates,
            revision: INITIAL_REVISION,
        })
    }

    /// A stand-in for a location referenced before it has synced. Revision 0
    /// loses against any real update.
    #[must_use]
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            coordinates: None,
            revision: 0,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.revision == 0 && self.name.is_empty() && self.coordinates.is_none()
    }
}

impl Entity for Location {
    const KIND: EntityKind = EntityKind::Location;

    fn id(&self) -> &str {
        &self.id
    }

    fn revision(&self) -> i64 {
        self.revision
    }
}

impl Marshal for Location {
    type Payload = LocationPayload;

    fn to_payload(&self) -> LocationPayload {
        LocationPayload {
            id: self.id.clone(),
            name: self.name.clone(),
            coordinates: self.coordinates,
            modified: Some(self.revision),
        }
    }

    fn from_payload(payload: LocationPayload) -> Result<Self, MarshalError> {
        require_id(Self::KIND, &payload.id).map_err(|e| MarshalError::malformed(Self::KIND, e))?;
        if let Some(Coordinates(x, y, z)) = payload.coordinates {
            if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                return Err(MarshalError::malformed(
                    Self::KIND,
                    "coordinates must be finite numbers",
                ));
            }
        }
        Ok(Self {
            id: payload.id,
            name: payload.name,
            coordinates: payload.coordinates,
            revision: payload.modified.unwrap_or(INITIAL_REVISION),
        })
    }
}
