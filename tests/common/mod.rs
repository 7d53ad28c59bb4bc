// Shared test helpers
#![allow(dead_code)]

use std::sync::Arc;

use tempserver::clock::ManualClock;
use tempserver::config::{BucketConfig, HistoryConfig};
use tempserver::history_repo::{AggregationEngine, TemperatureRepo};

pub fn bucket(name: &str, interval_seconds: u64, capacity: usize) -> BucketConfig {
    BucketConfig {
        name: name.into(),
        interval_seconds,
        capacity,
    }
}

pub fn history_config(raw_capacity: usize, buckets: Vec<BucketConfig>) -> HistoryConfig {
    HistoryConfig {
        raw_capacity,
        buckets,
    }
}

pub fn engine_with_clock(config: &HistoryConfig) -> (AggregationEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_epoch());
    (AggregationEngine::new(config, clock.clone()), clock)
}

pub fn repo_with_clock(config: &HistoryConfig) -> (Arc<TemperatureRepo>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_epoch());
    (
        Arc::new(TemperatureRepo::with_clock(config, clock.clone())),
        clock,
    )
}
