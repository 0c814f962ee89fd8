//! Marshaling policy applied to incoming payloads.

use redpin_core::enums::ReferencePolicy;
use serde::{Deserialize, Serialize};

const fn default_validate_schema() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Policy for a fingerprint whose location is not in the local store.
    #[serde(default)]
    pub missing_location: ReferencePolicy,

    /// Validate raw payloads against their JSON Schema before decoding.
    #[serde(default = "default_validate_schema")]
    pub validate_schema: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            missing_location: ReferencePolicy::default(),
            validate_schema: default_validate_schema(),
        }
    }
}
