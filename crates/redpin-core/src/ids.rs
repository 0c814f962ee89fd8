//! ID prefix constants.
//!
//! Locally minted identifiers have the form `"{prefix}-{8 hex chars}"`, e.g.
//! `"fpr-a3f8b2c1"`. Identifiers received from a remote store are accepted
//! verbatim and need not follow this scheme.

pub const PREFIX_LOCATION: &str = "loc";
pub const PREFIX_MEASUREMENT: &str = "msr";
pub const PREFIX_FINGERPRINT: &str = "fpr";
