//! Shared test utilities for redpin-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{DateTime, Utc};
    use redpin_core::entities::{Coordinates, Location, Reading};
    use serde_json::json;

    use crate::RedpinDb;
    use crate::service::RedpinService;
    use crate::trail::writer::TrailWriter;

    /// Create an in-memory RedpinService with trail disabled (for pure DB tests).
    pub async fn test_service() -> RedpinService {
        let db = RedpinDb::open_local(":memory:").await.unwrap();
        RedpinService::from_db(db, TrailWriter::disabled())
    }

    pub fn ts(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    pub fn readings() -> Vec<Reading> {
        vec![Reading::new("ap-1", -55), Reading::new("ap-2", -71)]
    }

    /// Create a location directly through the collector path.
    pub async fn seed_location(svc: &RedpinService, name: &str) -> Location {
        svc.create_location(name, Some(Coordinates(1.0, 2.0, 0.0)))
            .await
            .unwrap()
    }

    /// A fingerprint transport value referencing `location`.
    pub fn fingerprint_payload(id: &str, measurement_id: &str, location: &str) -> serde_json::Value {
        json!({
            "id": id,
            "measurement": {
                "id": measurement_id,
                "timestamp": 1_700_000_000_000_i64,
                "readings": [
                    {"sourceId": "ap-1", "signal": -55},
                    {"sourceId": "ap-2", "signal": -71}
                ]
            },
            "location": location
        })
    }
}
