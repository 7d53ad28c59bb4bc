// HTTP handlers: ingest, current value, raw history, buckets, version

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::IntoResponse,
};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;
use crate::models::{
    BucketSnapshotResponse, BucketSummary, CurrentTemperature, HistoryResponse, IngestPayload,
    LiveReading, coerce_temperature,
};
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// POST /set_temperature — validates the reading, ingests it and fans it out to /ws/temperature.
pub(super) async fn set_temperature(
    State(state): State<AppState>,
    payload: Result<Json<IngestPayload>, JsonRejection>,
) -> Result<Json<CurrentTemperature>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        tracing::warn!(error = %e, "rejected ingest body");
        ApiError::BadRequest(format!("invalid JSON body: {}", e.body_text()))
    })?;
    let Some(raw) = payload.temperature.as_ref() else {
        tracing::warn!(hostname = ?payload.hostname, "ingest without temperature");
        return Err(ApiError::BadRequest("temperature is required".into()));
    };
    let Some(value) = coerce_temperature(raw) else {
        tracing::warn!(hostname = ?payload.hostname, temperature = %raw, "non-numeric temperature");
        return Err(ApiError::BadRequest("temperature must be numeric".into()));
    };

    let sample = state.repo.ingest(value);
    tracing::debug!(
        temperature = value,
        hostname = ?payload.hostname,
        sensor = ?payload.sensor,
        "temperature ingested"
    );
    if let Some(sample) = sample {
        // Err only means nobody is subscribed.
        let _ = state.readings_tx.send(LiveReading {
            temperature: sample.value,
            timestamp: sample.timestamp_ms(),
            hostname: payload.hostname,
        });
    }
    Ok(Json(CurrentTemperature { temperature: value }))
}

/// GET /get_temperature — latest reading (0 before the first ingest).
pub(super) async fn get_temperature(State(state): State<AppState>) -> Json<CurrentTemperature> {
    Json(CurrentTemperature {
        temperature: state.repo.current(),
    })
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    seconds: i64,
}

/// GET /get_history?seconds=N — raw values only, oldest first.
pub(super) async fn get_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        ApiError::BadRequest(format!(
            "seconds must be an integer query parameter: {}",
            e.body_text()
        ))
    })?;
    let history = state
        .repo
        .history(query.seconds)
        .iter()
        .map(|s| s.value)
        .collect();
    Ok(Json(HistoryResponse { history }))
}

/// GET /buckets — configured buckets in configuration order.
pub(super) async fn list_buckets(State(state): State<AppState>) -> Json<Vec<BucketSummary>> {
    Json(state.repo.buckets())
}

/// GET /buckets/{name} — one bucket's aggregated points.
pub(super) async fn get_bucket(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BucketSnapshotResponse>, ApiError> {
    let snapshot = state.repo.bucket_snapshot(&name)?;
    Ok(Json(snapshot.into()))
}
