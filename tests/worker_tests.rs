// Stats worker: ticks on paused time and exits on shutdown

mod common;

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use common::{bucket, history_config, repo_with_clock};
use tempserver::worker::{WorkerConfig, WorkerDeps, spawn};

#[tokio::test(start_paused = true)]
async fn worker_ticks_and_stops_on_shutdown() {
    let (repo, _clock) = repo_with_clock(&history_config(10, vec![bucket("10s-mean", 10, 5)]));
    repo.ingest(20.0);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            repo: repo.clone(),
            ws_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_rx,
        },
        WorkerConfig {
            stats_log_interval_secs: 1,
        },
    );

    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
    assert!(!handle.is_finished());
    let _ = shutdown_tx.send(());
    handle.await.unwrap();
    assert_eq!(repo.stats().raw_len, 1);
}

#[tokio::test]
async fn worker_stops_when_shutdown_sender_dropped() {
    let (repo, _clock) = repo_with_clock(&history_config(10, vec![]));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = spawn(
        WorkerDeps {
            repo,
            ws_connections: Arc::new(AtomicUsize::new(0)),
            shutdown_rx,
        },
        WorkerConfig {
            stats_log_interval_secs: 3600,
        },
    );
    drop(shutdown_tx);
    handle.await.unwrap();
}
