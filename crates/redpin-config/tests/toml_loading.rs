//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use redpin_config::{ConfigError, RedpinConfig};
use redpin_core::enums::ReferencePolicy;

#[test]
fn loads_store_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
path = "/var/lib/redpin/store.db"
trail_dir = "/var/lib/redpin/trail"
trail_enabled = false
"#,
        )?;

        let config: RedpinConfig = Figment::from(Serialized::defaults(RedpinConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.path, "/var/lib/redpin/store.db");
        assert_eq!(config.store.trail_dir, "/var/lib/redpin/trail");
        assert!(!config.store.trail_enabled);
        Ok(())
    });
}

#[test]
fn loads_sync_policy_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[sync]
missing_location = "create_placeholder"
validate_schema = false
"#,
        )?;

        let config = RedpinConfig::load_from_file("config.toml").expect("config loads");
        assert_eq!(config.sync.missing_location, ReferencePolicy::CreatePlaceholder);
        assert!(!config.sync.validate_schema);
        // Untouched sections keep their defaults.
        assert_eq!(config.store.path, ".redpin/redpin.db");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
path = "from-toml.db"

[general]
default_limit = 10
"#,
        )?;
        jail.set_env("REDPIN_STORE__PATH", "from-env.db");
        jail.set_env("REDPIN_SYNC__MISSING_LOCATION", "create_placeholder");

        let config: RedpinConfig = Figment::from(Serialized::defaults(RedpinConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("REDPIN_").split("__"))
            .extract()?;

        assert_eq!(config.store.path, "from-env.db");
        assert_eq!(config.general.default_limit, 10);
        assert_eq!(config.sync.missing_location, ReferencePolicy::CreatePlaceholder);
        Ok(())
    });
}

#[test]
fn project_config_is_discovered() {
    Jail::expect_with(|jail| {
        jail.create_dir(".redpin")?;
        jail.create_file(
            ".redpin/config.toml",
            r#"
[general]
default_limit = 7
"#,
        )?;

        let config = RedpinConfig::load().expect("config loads");
        assert_eq!(config.general.default_limit, 7);
        Ok(())
    });
}

#[test]
fn unknown_policy_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[sync]
missing_location = "guess"
"#,
        )?;

        let result = RedpinConfig::load_from_file("config.toml");
        assert!(matches!(result, Err(ConfigError::Source(_))));
        Ok(())
    });
}

#[test]
fn invalid_values_are_rejected_after_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
path = ""
"#,
        )?;

        let result = RedpinConfig::load_from_file("config.toml");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field, .. }) if field == "store.path"
        ));
        Ok(())
    });
}
