use thiserror::Error;

/// Failure to assemble a [`crate::RedpinConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `REDPIN_*` variable could not be merged or extracted.
    #[error("cannot read redpin configuration: {0}")]
    Source(#[from] figment::Error),

    /// Sources merged cleanly but a field holds an unusable value.
    #[error("redpin configuration field `{field}` is invalid: {reason}")]
    InvalidValue { field: String, reason: String },
}
