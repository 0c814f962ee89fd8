//! Marshaling integration tests against an in-memory store.
//!
//! - Round-trip of fingerprints through the transport format
//! - Ownership: deleting a fingerprint removes its measurement only
//! - Non-null relations and reference integrity
//! - Location sharing, including concurrent imports of one location
//! - The canonical example payload

use pretty_assertions::assert_eq;
use serde_json::json;

use redpin_core::entities::{Coordinates, Reading};
use redpin_core::enums::{EntityKind, MergeOutcome};
use redpin_core::errors::MarshalError;
use redpin_core::marshal::Marshal;
use redpin_db::error::DatabaseError;
use redpin_db::helpers::count_rows;
use redpin_db::service::RedpinService;

async fn test_service() -> RedpinService {
    RedpinService::new_local(":memory:", None).await.unwrap()
}

async fn counts(svc: &RedpinService) -> (u64, u64, u64) {
    let conn = svc.db().conn();
    (
        count_rows(conn, EntityKind::Location).await.unwrap(),
        count_rows(conn, EntityKind::Fingerprint).await.unwrap(),
        count_rows(conn, EntityKind::Measurement).await.unwrap(),
    )
}

fn example_payload() -> serde_json::Value {
    json!({
        "id": "fp1",
        "measurement": {
            "id": "m1",
            "timestamp": 1_700_000_000_000_i64,
            "readings": [{ "sourceId": "ap-1", "signal": -55 }]
        },
        "location": "loc1"
    })
}

// ---------------------------------------------------------------------------
// Example and round-trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn example_payload_imports_with_one_reading() {
    let svc = test_service().await;
    svc.import_location(&json!({ "id": "loc1", "name": "Office 42" }))
        .await
        .unwrap();

    let imported = svc.import_fingerprint(&example_payload()).await.unwrap();
    assert_eq!(imported.outcome, MergeOutcome::Created);

    let fp = imported.entity;
    assert_eq!(fp.id, "fp1");
    assert_eq!(fp.location_id, "loc1");
    assert_eq!(fp.measurement.readings, vec![Reading::new("ap-1", -55)]);

    let reserialized = serde_json::to_string(&fp.to_transport().unwrap()).unwrap();
    let original = serde_json::to_string(&example_payload()).unwrap();
    assert_eq!(reserialized, original);
}

#[tokio::test]
async fn collected_fingerprint_roundtrips_through_transport() {
    let source = test_service().await;
    let loc = source
        .create_location("Lab", Some(Coordinates(3.0, 4.0, 0.5)))
        .await
        .unwrap();
    let fp = source
        .create_fingerprint(
            &loc.id,
            chrono::DateTime::from_timestamp_millis(1_712_000_000_123).unwrap(),
            vec![Reading::new("bssid-a", -61), Reading::new("bssid-b", -77)],
        )
        .await
        .unwrap();

    // A second store receives the location first, then the fingerprint.
    let target = test_service().await;
    target
        .import_location(&source.export_location(&loc.id).await.unwrap())
        .await
        .unwrap();
    let imported = target
        .import_fingerprint(&source.export_fingerprint(&fp.id).await.unwrap())
        .await
        .unwrap();

    assert_eq!(imported.entity.id, fp.id);
    assert_eq!(imported.entity.measurement, fp.measurement);
    assert_eq!(imported.entity.location_id, fp.location_id);
    assert_eq!(target.get_location(&loc.id).await.unwrap(), loc);
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deleting_fingerprint_removes_measurement_keeps_location() {
    let svc = test_service().await;
    svc.import_location(&json!({ "id": "loc1", "name": "Office 42" }))
        .await
        .unwrap();
    svc.import_fingerprint(&example_payload()).await.unwrap();
    assert_eq!(counts(&svc).await, (1, 1, 1));

    svc.delete_fingerprint("fp1").await.unwrap();

    assert_eq!(counts(&svc).await, (1, 0, 0));
    assert!(svc.get_measurement("m1").await.is_err());
    assert_eq!(svc.get_location("loc1").await.unwrap().name, "Office 42");
}

// ---------------------------------------------------------------------------
// Non-null and reference integrity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_relations_are_malformed() {
    let svc = test_service().await;
    svc.import_location(&json!({ "id": "loc1", "name": "Office 42" }))
        .await
        .unwrap();

    let mut no_measurement = example_payload();
    no_measurement.as_object_mut().unwrap().remove("measurement");
    let mut no_location = example_payload();
    no_location.as_object_mut().unwrap().remove("location");
    let mut no_readings = example_payload();
    no_readings["measurement"]["readings"] = json!([]);

    for payload in [no_measurement, no_location, no_readings] {
        let err = svc.import_fingerprint(&payload).await.unwrap_err();
        assert!(
            matches!(
                err,
                DatabaseError::Marshal(MarshalError::MalformedPayload { .. })
            ),
            "expected malformed payload, got {err}"
        );
        assert!(!err.is_retriable());
    }
    assert_eq!(counts(&svc).await, (1, 0, 0));
}

#[tokio::test]
async fn unknown_location_leaves_no_rows() {
    let svc = test_service().await;
    let err = svc.import_fingerprint(&example_payload()).await.unwrap_err();

    assert!(matches!(
        err,
        DatabaseError::Marshal(MarshalError::UnresolvedReference { .. })
    ));
    assert!(err.is_retriable());
    assert_eq!(counts(&svc).await, (0, 0, 0));

    // Once the location syncs, the same payload succeeds.
    svc.import_location(&json!({ "id": "loc1", "name": "Office 42" }))
        .await
        .unwrap();
    svc.import_fingerprint(&example_payload()).await.unwrap();
    assert_eq!(counts(&svc).await, (1, 1, 1));
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fingerprints_share_one_location_row() {
    let svc = test_service().await;
    svc.import_location(&json!({ "id": "loc1", "name": "Office 42" }))
        .await
        .unwrap();

    let mut second = example_payload();
    second["id"] = json!("fp2");
    second["measurement"]["id"] = json!("m2");

    svc.import_fingerprint(&example_payload()).await.unwrap();
    svc.import_fingerprint(&second).await.unwrap();

    assert_eq!(counts(&svc).await, (1, 2, 2));
    let at_location = svc.list_fingerprints_at_location("loc1").await.unwrap();
    assert_eq!(at_location.len(), 2);
    assert!(at_location.iter().all(|fp| fp.location_id == "loc1"));
}

#[tokio::test]
async fn concurrent_imports_of_one_location_store_one_row() {
    let svc = test_service().await;
    let a = json!({ "id": "loc1", "name": "first", "modified": 1 });
    let b = json!({ "id": "loc1", "name": "second", "modified": 1 });

    let (ra, rb) = tokio::join!(svc.import_location(&a), svc.import_location(&b));
    let mut outcomes = vec![ra.unwrap().outcome, rb.unwrap().outcome];
    outcomes.sort_by_key(|o| o.as_str());

    assert_eq!(outcomes, vec![MergeOutcome::Created, MergeOutcome::Updated]);
    assert_eq!(counts(&svc).await, (1, 0, 0));
}
