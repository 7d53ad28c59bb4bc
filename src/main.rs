use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tempserver::*;
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info");

    let app_config = config::AppConfig::load()?;
    let (readings_tx, _) =
        broadcast::channel::<models::LiveReading>(app_config.publishing.broadcast_capacity);

    let repo = Arc::new(history_repo::TemperatureRepo::new(&app_config.history));
    tracing::info!(
        raw_capacity = app_config.history.raw_capacity,
        buckets = app_config.history.buckets.len(),
        "temperature history ready"
    );

    let ws_connections = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            repo: repo.clone(),
            ws_connections: ws_connections.clone(),
            shutdown_rx,
        },
        worker::WorkerConfig {
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(repo, readings_tx, ws_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
