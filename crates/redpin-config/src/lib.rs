//! # redpin-config
//!
//! Layered configuration loading for Redpin using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`REDPIN_*` prefix, `__` as separator)
//! 2. Project-level `.redpin/config.toml`
//! 3. User-level `~/.config/redpin/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `REDPIN_STORE__PATH` -> `store.path`,
//! `REDPIN_SYNC__MISSING_LOCATION` -> `sync.missing_location`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use redpin_config::RedpinConfig;
//!
//! let config = RedpinConfig::load_with_dotenv().expect("config");
//! println!("store: {}", config.store.path);
//! ```

mod error;
mod general;
mod store;
mod sync;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RedpinConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl RedpinConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`. Use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration from an explicit TOML file layered over the
    /// defaults, with environment variables still taking precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed or a value is invalid.
    pub fn load_from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.into()))
            .merge(Env::prefixed("REDPIN_").split("__"));
        Self::from_figment(&figment)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".redpin/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("REDPIN_").split("__"))
    }

    /// Extract and validate a config from a figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty store path, an empty
    /// trail directory while the trail is enabled, or a zero list limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.store.trail_enabled && self.store.trail_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.trail_dir".into(),
                reason: "must not be empty while store.trail_enabled is true".into(),
            });
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("redpin").join("config.toml"))
    }
}
