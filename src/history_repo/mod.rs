// In-memory temperature history shared across request handlers.
// One mutex guards the whole engine: ingest and every read are serialized.

pub mod aggregation;
pub mod engine;
pub mod store;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::instrument;

use crate::clock::{Clock, SystemClock};
use crate::config::HistoryConfig;
use crate::error::CoreError;
use crate::models::{BucketSnapshot, BucketSummary, Sample};
pub use engine::{AggregationEngine, ResolutionBucket};
pub use store::SampleStore;

/// Point-in-time counts for stats logging.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoStats {
    pub current: f64,
    pub raw_len: usize,
    pub buckets: Vec<BucketSummary>,
}

pub struct TemperatureRepo {
    engine: Mutex<AggregationEngine>,
}

impl TemperatureRepo {
    pub fn new(config: &HistoryConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &HistoryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine: Mutex::new(AggregationEngine::new(config, clock)),
        }
    }

    // No engine operation can leave state half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, AggregationEngine> {
        self.engine.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ingests one reading and returns the raw sample it was stored as.
    #[instrument(skip(self), fields(repo = "temperature", operation = "ingest"))]
    pub fn ingest(&self, value: f64) -> Option<Sample> {
        let mut engine = self.lock();
        engine.ingest(value);
        engine.raw_history().last().copied()
    }

    pub fn current(&self) -> f64 {
        self.lock().current()
    }

    pub fn history(&self, seconds: i64) -> Vec<Sample> {
        self.lock().history(seconds)
    }

    pub fn bucket_snapshot(&self, name: &str) -> Result<BucketSnapshot, CoreError> {
        self.lock().bucket_snapshot(name)
    }

    pub fn buckets(&self) -> Vec<BucketSummary> {
        self.lock().buckets()
    }

    pub fn stats(&self) -> RepoStats {
        let engine = self.lock();
        RepoStats {
            current: engine.current(),
            raw_len: engine.raw_len(),
            buckets: engine.buckets(),
        }
    }
}
