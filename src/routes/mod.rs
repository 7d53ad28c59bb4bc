// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::history_repo::TemperatureRepo;
use crate::models::LiveReading;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<TemperatureRepo>,
    pub(crate) readings_tx: broadcast::Sender<LiveReading>,
    pub(crate) ws_connections: Arc<AtomicUsize>,
}

pub fn app(
    repo: Arc<TemperatureRepo>,
    readings_tx: broadcast::Sender<LiveReading>,
    ws_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        repo,
        readings_tx,
        ws_connections,
    };
    Router::new()
        .route("/", get(|| async { "Hello from tempserver!" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/set_temperature", post(http::set_temperature)) // POST /set_temperature
        .route("/get_temperature", get(http::get_temperature)) // GET /get_temperature
        .route("/get_history", get(http::get_history)) // GET /get_history?seconds=N
        .route("/buckets", get(http::list_buckets)) // GET /buckets
        .route("/buckets/{name}", get(http::get_bucket)) // GET /buckets/{name}
        .route("/ws/temperature", get(ws::ws_temperature)) // WS /ws/temperature
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .with_state(state)
}
