//! # redpin-core
//!
//! Core types and the marshaling contract for the Redpin fingerprint store.
//!
//! This crate provides the foundational types shared across all Redpin crates:
//! - Entity structs for the persisted data model (locations, measurements, fingerprints)
//! - The `Entity` base contract and the `Marshal` capability trait
//! - Transport payload types (the JSON shapes exchanged during sync)
//! - Entity kinds, reference policies, and trail operation kinds
//! - ID prefix constants
//! - Marshaling and validation error types
//! - Trail operation envelope for JSONL persistence

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod marshal;
pub mod trail;
pub mod transport;
