//! Settings shared by every CLI command.

use serde::{Deserialize, Serialize};

/// Row cap applied to `list` and `trail` when neither the command nor the
/// global `--limit` flag names one.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIST_LIMIT,
        }
    }
}
