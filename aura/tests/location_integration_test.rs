mod common;

use chrono::Utc;
use common::spawn_app;

use aura::db::LocationStore;
use aura::models::PersistedLocation;

#[tokio::test]
async fn unknown_device_gets_the_fallback_coordinate() {
    let app = spawn_app(None).await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(app.url("/api/v1/location/never-seen"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["deviceId"], "never-seen");
    assert_eq!(body["data"]["lat"], 13.0827);
    assert_eq!(body["data"]["lng"], 80.2707);
    assert_eq!(body["data"]["origin"], "PERSISTED");
}

#[tokio::test]
async fn stored_location_bridges_before_any_live_fix() {
    let app = spawn_app(None).await;
    app.db
        .upsert_location(&PersistedLocation {
            device_id: "D1".to_string(),
            lat: 12.9716,
            lng: 77.5946,
            updated_at: Utc::now(),
        })
        .await
        .expect("seed upsert");
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(app.url("/api/v1/location/D1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["lat"], 12.9716);
    assert_eq!(body["data"]["lng"], 77.5946);
    assert_eq!(body["data"]["origin"], "PERSISTED");
}

#[tokio::test]
async fn last_write_wins_in_the_store() {
    let app = spawn_app(None).await;
    for (lat, lng) in [(10.0, 70.0), (11.0, 71.0), (12.0, 72.0)] {
        app.db
            .upsert_location(&PersistedLocation {
                device_id: "D1".to_string(),
                lat,
                lng,
                updated_at: Utc::now(),
            })
            .await
            .expect("seed upsert");
    }
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(app.url("/api/v1/location/D1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["lat"], 12.0);
    assert_eq!(body["data"]["lng"], 72.0);
}
