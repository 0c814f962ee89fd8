pub mod batch;
pub mod dispatch;
pub mod fingerprint;
pub mod location;
pub mod schema;
pub mod shared;
pub mod stats;
pub mod trail;
