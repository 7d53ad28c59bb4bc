// Aggregation engine: current value, raw history, and time-gated mean buckets.
//
// On every ingest each bucket checks its own gate (now - last_emit >= interval).
// When it passes, the bucket appends the mean of raw samples newer than its
// last emission and moves last_emit to now. last_emit starts at construction
// time. A clock that moved backwards yields a negative elapsed time, which
// never passes the gate.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use super::aggregation;
use super::store::SampleStore;
use crate::clock::Clock;
use crate::config::{BucketConfig, HistoryConfig};
use crate::error::CoreError;
use crate::models::{BucketSnapshot, BucketSummary, Sample};

/// A named derived series: one mean per `interval_seconds`, bounded at `capacity` points.
#[derive(Debug, Clone)]
pub struct ResolutionBucket {
    name: String,
    interval_seconds: u64,
    interval: TimeDelta,
    last_emit_time: DateTime<Utc>,
    store: SampleStore,
}

impl ResolutionBucket {
    fn new(config: &BucketConfig, created_at: DateTime<Utc>) -> Self {
        let interval = i64::try_from(config.interval_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            name: config.name.clone(),
            interval_seconds: config.interval_seconds,
            interval,
            last_emit_time: created_at,
            store: SampleStore::new(config.capacity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds
    }

    pub fn last_emit_time(&self) -> DateTime<Utc> {
        self.last_emit_time
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    fn gate_passes(&self, now: DateTime<Utc>) -> bool {
        now - self.last_emit_time >= self.interval
    }

    /// Emits one mean point if the gate passes. Returns the emitted value.
    fn evaluate(&mut self, raw: &SampleStore, now: DateTime<Utc>) -> Option<f64> {
        if !self.gate_passes(now) {
            return None;
        }
        let mean = aggregation::mean(&raw.since(self.last_emit_time))?;
        self.store.append(mean, now);
        self.last_emit_time = now;
        Some(mean)
    }

    fn summary(&self) -> BucketSummary {
        BucketSummary {
            name: self.name.clone(),
            interval_seconds: self.interval_seconds,
            capacity: self.store.capacity(),
            length: self.store.len(),
        }
    }

    fn snapshot(&self) -> BucketSnapshot {
        BucketSnapshot {
            name: self.name.clone(),
            interval_seconds: self.interval_seconds,
            capacity: self.store.capacity(),
            history: self.store.snapshot(),
        }
    }
}

pub struct AggregationEngine {
    clock: Arc<dyn Clock>,
    current_value: f64,
    raw_history: SampleStore,
    /// Configuration order; names are unique (checked by config validation).
    buckets: Vec<ResolutionBucket>,
}

impl AggregationEngine {
    pub fn new(config: &HistoryConfig, clock: Arc<dyn Clock>) -> Self {
        let created_at = clock.now();
        let buckets = config
            .buckets
            .iter()
            .map(|b| ResolutionBucket::new(b, created_at))
            .collect();
        Self {
            clock,
            current_value: 0.0,
            raw_history: SampleStore::new(config.raw_capacity),
            buckets,
        }
    }

    /// Records a reading: updates the current value, appends to raw history,
    /// then evaluates every bucket's gate independently.
    pub fn ingest(&mut self, value: f64) {
        let now = self.clock.now();
        self.current_value = value;
        self.raw_history.append(value, now);
        for bucket in &mut self.buckets {
            if let Some(mean) = bucket.evaluate(&self.raw_history, now) {
                debug!(
                    bucket = %bucket.name,
                    mean,
                    points = bucket.store.len(),
                    "bucket emitted"
                );
            }
        }
    }

    pub fn current(&self) -> f64 {
        self.current_value
    }

    /// Raw samples from the last `seconds` seconds, oldest first. Empty when `seconds <= 0`.
    pub fn history(&self, seconds: i64) -> Vec<Sample> {
        if seconds <= 0 {
            return Vec::new();
        }
        let cutoff = TimeDelta::try_seconds(seconds)
            .and_then(|window| self.clock.now().checked_sub_signed(window));
        match cutoff {
            Some(cutoff) => self.raw_history.since(cutoff),
            // Window reaches past the representable range: everything stored is inside it.
            None => self.raw_history.snapshot(),
        }
    }

    pub fn bucket_snapshot(&self, name: &str) -> Result<BucketSnapshot, CoreError> {
        self.bucket(name)
            .map(ResolutionBucket::snapshot)
            .ok_or_else(|| CoreError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn bucket(&self, name: &str) -> Option<&ResolutionBucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    pub fn buckets(&self) -> Vec<BucketSummary> {
        self.buckets.iter().map(ResolutionBucket::summary).collect()
    }

    pub fn bucket_names(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn raw_history(&self) -> &SampleStore {
        &self.raw_history
    }

    pub fn raw_len(&self) -> usize {
        self.raw_history.len()
    }
}
