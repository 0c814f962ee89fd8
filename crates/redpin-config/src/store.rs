//! Local store configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".redpin/redpin.db".to_string()
}

fn default_trail_dir() -> String {
    ".redpin/trail".to_string()
}

const fn default_trail_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Path to the libSQL database file. `":memory:"` keeps everything in RAM.
    #[serde(default = "default_path")]
    pub path: String,

    /// Directory receiving the per-day JSONL sync trail.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,

    /// Whether committed mutations are appended to the trail.
    #[serde(default = "default_trail_enabled")]
    pub trail_enabled: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            trail_dir: default_trail_dir(),
            trail_enabled: default_trail_enabled(),
        }
    }
}

impl StoreConfig {
    /// Whether the database lives only in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
