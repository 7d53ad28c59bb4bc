// Integration tests: HTTP and WebSocket endpoints

mod common;

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use common::{bucket, history_config, repo_with_clock};
use tempserver::clock::ManualClock;
use tempserver::history_repo::TemperatureRepo;
use tempserver::models::LiveReading;
use tempserver::routes;
use tokio::sync::broadcast;

fn test_app() -> (axum::Router, Arc<TemperatureRepo>, Arc<ManualClock>) {
    let config = history_config(
        100,
        vec![bucket("3s-mean", 3, 10), bucket("1min-mean", 60, 10)],
    );
    let (repo, clock) = repo_with_clock(&config);
    let (tx, _) = broadcast::channel(16);
    let app = routes::app(repo.clone(), tx, Arc::new(AtomicUsize::new(0)));
    (app, repo, clock)
}

fn test_server() -> (TestServer, Arc<TemperatureRepo>, Arc<ManualClock>) {
    let (app, repo, clock) = test_app();
    (TestServer::new(app), repo, clock)
}

#[tokio::test]
async fn test_root_endpoint() {
    let (server, _, _) = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("Hello from tempserver!");
}

#[tokio::test]
async fn test_version_endpoint() {
    let (server, _, _) = test_server();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("tempserver")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_current_temperature_defaults_to_zero() {
    let (server, _, _) = test_server();
    let response = server.get("/get_temperature").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "temperature": 0.0 }));
}

#[tokio::test]
async fn test_set_then_get_temperature() {
    let (server, repo, _) = test_server();
    let response = server
        .post("/set_temperature")
        .json(&serde_json::json!({ "temperature": 21.456, "hostname": "raspberrypi" }))
        .await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "temperature": 21.46 }));
    assert_eq!(repo.current(), 21.456, "stored value is not rounded");

    let response = server.get("/get_temperature").await;
    response.assert_json(&serde_json::json!({ "temperature": 21.46 }));
}

#[tokio::test]
async fn test_set_temperature_accepts_numeric_string() {
    let (server, repo, _) = test_server();
    server
        .post("/set_temperature")
        .json(&serde_json::json!({ "temperature": "18.5" }))
        .await
        .assert_status_ok();
    assert_eq!(repo.current(), 18.5);
}

#[tokio::test]
async fn test_set_temperature_rejects_missing_value() {
    let (server, repo, _) = test_server();
    let response = server
        .post("/set_temperature")
        .json(&serde_json::json!({ "hostname": "notebook" }))
        .await;
    response.assert_status_bad_request();
    let json: serde_json::Value = response.json();
    assert!(json["message"].as_str().unwrap().contains("temperature"));
    assert_eq!(repo.history(10).len(), 0);
}

#[tokio::test]
async fn test_set_temperature_rejects_non_numeric_value() {
    let (server, repo, _) = test_server();
    server
        .post("/set_temperature")
        .json(&serde_json::json!({ "temperature": "warm" }))
        .await
        .assert_status_bad_request();
    server
        .post("/set_temperature")
        .json(&serde_json::json!({ "temperature": null }))
        .await
        .assert_status_bad_request();
    assert_eq!(repo.history(10).len(), 0);
}

#[tokio::test]
async fn test_set_temperature_rejects_non_json_body() {
    let (server, _, _) = test_server();
    server
        .post("/set_temperature")
        .text("temperature=21")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_history_returns_recent_values() {
    let (server, repo, clock) = test_server();
    for v in [1.0, 2.0, 3.0, 4.0] {
        clock.advance_secs(1);
        repo.ingest(v);
    }
    let response = server
        .get("/get_history")
        .add_query_param("seconds", 2)
        .await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "history": [3.0, 4.0] }));

    let response = server
        .get("/get_history")
        .add_query_param("seconds", 600)
        .await;
    response.assert_json(&serde_json::json!({ "history": [1.0, 2.0, 3.0, 4.0] }));
}

#[tokio::test]
async fn test_history_empty_window() {
    let (server, repo, _) = test_server();
    repo.ingest(5.0);
    for seconds in [0, -5] {
        let response = server
            .get("/get_history")
            .add_query_param("seconds", seconds)
            .await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({ "history": [] }));
    }
}

#[tokio::test]
async fn test_history_requires_integer_seconds() {
    let (server, _, _) = test_server();
    server.get("/get_history").await.assert_status_bad_request();
    server
        .get("/get_history")
        .add_query_param("seconds", "ten")
        .await
        .assert_status_bad_request();
    server
        .get("/get_history")
        .add_query_param("seconds", "1.5")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_bucket_snapshot_after_ingest() {
    let (server, _, clock) = test_server();
    for v in [10.0, 20.0, 30.0] {
        clock.advance_secs(1);
        server
            .post("/set_temperature")
            .json(&serde_json::json!({ "temperature": v }))
            .await
            .assert_status_ok();
    }
    let response = server.get("/buckets/3s-mean").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({
        "name": "3s-mean",
        "index_size": 10,
        "record_interval": 3,
        "history": [{ "temperature": 20.0, "timestamp": 3_000 }],
    }));
}

#[tokio::test]
async fn test_unknown_bucket_is_404() {
    let (server, _, _) = test_server();
    let response = server.get("/buckets/does-not-exist").await;
    response.assert_status_not_found();
    let json: serde_json::Value = response.json();
    assert!(json["message"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn test_list_buckets() {
    let (server, _, _) = test_server();
    let response = server.get("/buckets").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!([
        { "name": "3s-mean", "record_interval": 3, "index_size": 10, "length": 0 },
        { "name": "1min-mean", "record_interval": 60, "index_size": 10, "length": 0 },
    ]));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (server, _, _) = test_server();
    let response = server
        .get("/get_temperature")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:3000"),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

// --- WebSocket tests (require http_transport + ws feature) ---
// Receive until we get JSON of the wanted shape (welcome message comes first).

async fn receive_first_json_text<T: serde::de::DeserializeOwned>(
    ws: &mut axum_test::TestWebSocket,
) -> T {
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    loop {
        let text = ws.receive_text().await;
        if let Ok(v) = serde_json::from_str::<T>(&text) {
            return v;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for JSON"
        );
    }
}

#[tokio::test]
async fn test_ws_temperature_streams_ingested_readings() {
    let (app, _, clock) = test_app();
    let server = TestServer::builder().http_transport().build(app);
    let mut ws = server
        .get_websocket("/ws/temperature")
        .await
        .into_websocket()
        .await;

    let welcome: serde_json::Value = receive_first_json_text(&mut ws).await;
    assert_eq!(welcome, serde_json::json!({ "temperature": 0.0 }));

    clock.advance_secs(7);
    server
        .post("/set_temperature")
        .json(&serde_json::json!({ "temperature": 23.5, "hostname": "raspberrypi" }))
        .await
        .assert_status_ok();

    let reading: LiveReading = receive_first_json_text(&mut ws).await;
    assert_eq!(reading.temperature, 23.5);
    assert_eq!(reading.timestamp, 7_000);
    assert_eq!(reading.hostname.as_deref(), Some("raspberrypi"));
}
