// Background stats logger: periodically reports history fill levels at INFO.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::{Duration, interval};
use tracing::info;

use crate::history_repo::TemperatureRepo;

pub struct WorkerDeps {
    pub repo: Arc<TemperatureRepo>,
    pub ws_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub stats_log_interval_secs: u64,
}

/// Spawns the stats logger. Exits when `shutdown_rx` fires or its sender is dropped.
pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        repo,
        ws_connections,
        mut shutdown_rx,
    } = deps;
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(config.stats_log_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick completes immediately; skip it so the first report covers a full interval.
        tick.tick().await;
        loop {
            tokio::select! {
                _ = tick.tick() => log_stats(&repo, &ws_connections),
                _ = &mut shutdown_rx => break,
            }
        }
        tracing::debug!("Stats worker shutting down");
    })
}

fn log_stats(repo: &TemperatureRepo, ws_connections: &AtomicUsize) {
    let stats = repo.stats();
    let buckets = stats
        .buckets
        .iter()
        .map(|b| format!("{}={}/{}", b.name, b.length, b.capacity))
        .collect::<Vec<_>>()
        .join(" ");
    info!(
        current = stats.current,
        raw_samples = stats.raw_len,
        ws_clients = ws_connections.load(Ordering::Relaxed),
        buckets = %buckets,
        "history stats"
    );
}
