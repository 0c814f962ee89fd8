//! # redpin-schema
//!
//! JSON Schema registry and validation for Redpin.
//!
//! Payload types are defined in `redpin-core` with `#[derive(JsonSchema)]`.
//! This crate builds their schemas once and validates raw transport values
//! against them, so a rejected payload can report every violation at once
//! instead of the first one serde happens to hit.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
