use thiserror::Error;

/// Failures raised by [`crate::SchemaRegistry`].
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No schema is registered under this name.
    #[error("no schema registered as `{0}`")]
    NotFound(String),

    /// The instance violates the schema; one message per violation.
    #[error("payload violates schema: {}", errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    /// A registered schema could not be compiled by the validator.
    #[error("schema `{name}` does not compile: {reason}")]
    Uncompilable { name: String, reason: String },
}
