//! Timeline Integration Tests
//!
//! Ownership changes recorded through the service layer must show up in the
//! HTTP timeline and history listings, merged with evidence newest first.

mod common;

use common::fixtures::{evidence, plot_a};
use common::{assert_status, assert_success, parse_json, TestApp};
use land_registry_core::AssetId;
use land_registry_service::RecordChangeRequest;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_ownership_transfer_appears_in_history() {
    let app = TestApp::new().await;
    assert_status(&app.post_json("/assets/", &plot_a()).await, StatusCode::CREATED);

    let change = app
        .services
        .registration()
        .record_change(
            AssetId::new(1),
            RecordChangeRequest {
                name: "Plot A".to_string(),
                owner: "Owner Y".to_string(),
                change_reason: "Sale".to_string(),
            },
        )
        .await
        .expect("Failed to record change");
    assert_eq!(change.asset.owner, "Owner Y");
    assert!(change.version.changed_at >= change.asset.created_at);

    let asset: Value = parse_json(app.get("/assets/1").await).await;
    assert_eq!(asset["owner"], "Owner Y");

    let response = app.get("/assets/1/versions").await;
    assert_success(&response);
    let versions: Vec<Value> = parse_json(response).await;
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["change_reason"], "Genesis Creation");
    assert_eq!(versions[0]["owner"], "Owner X");
    assert_eq!(versions[1]["change_reason"], "Sale");
    assert_eq!(versions[1]["owner"], "Owner Y");
}

#[tokio::test]
async fn test_timeline_is_newest_first() {
    let app = TestApp::new().await;
    app.post_json("/assets/", &plot_a()).await;

    app.post_json("/evidence/", &evidence(1, "Photo", "fence built"))
        .await;
    app.services
        .registration()
        .record_change(
            AssetId::new(1),
            RecordChangeRequest {
                name: "Plot A".to_string(),
                owner: "Owner Y".to_string(),
                change_reason: "Sale".to_string(),
            },
        )
        .await
        .expect("Failed to record change");
    app.post_json("/evidence/", &evidence(1, "Survey", "beacons checked"))
        .await;

    let timeline: Vec<Value> = parse_json(app.get("/assets/1/timeline").await).await;
    assert_eq!(timeline.len(), 4);

    let timestamps: Vec<chrono::DateTime<chrono::Utc>> = timeline
        .iter()
        .map(|event| {
            event["timestamp"]
                .as_str()
                .and_then(|t| t.parse().ok())
                .expect("timestamp should be RFC 3339")
        })
        .collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] >= pair[1]));

    // The genesis row is always the oldest event
    assert_eq!(timeline[3]["event_type"], "version");
    assert_eq!(timeline[3]["description"], "Genesis Creation");

    let kinds: Vec<&str> = timeline
        .iter()
        .filter_map(|event| event["event_type"].as_str())
        .collect();
    assert_eq!(kinds.iter().filter(|k| **k == "evidence").count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == "version").count(), 2);
}

#[tokio::test]
async fn test_timeline_is_scoped_to_one_asset() {
    let app = TestApp::new().await;
    app.post_json("/assets/", &plot_a()).await;
    app.post_json("/assets/", &common::fixtures::parcel("Plot B", "Owner Z"))
        .await;

    app.post_json("/evidence/", &evidence(2, "Photo", "borehole drilled"))
        .await;

    let first: Vec<Value> = parse_json(app.get("/assets/1/timeline").await).await;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0]["event_type"], "version");

    let second: Vec<Value> = parse_json(app.get("/assets/2/timeline").await).await;
    assert_eq!(second.len(), 2);
    assert_eq!(second[0]["description"], "Photo: borehole drilled");
}

#[tokio::test]
async fn test_record_change_on_missing_asset() {
    let app = TestApp::new().await;

    let result = app
        .services
        .registration()
        .record_change(
            AssetId::new(7),
            RecordChangeRequest {
                name: "Plot A".to_string(),
                owner: "Owner Y".to_string(),
                change_reason: "Sale".to_string(),
            },
        )
        .await;

    assert!(result.is_err());
    let stats = app.services.search().stats().await.expect("Failed to read stats");
    assert_eq!(stats.versions, 0);
}
