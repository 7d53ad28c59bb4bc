// Read-side views of a resolution bucket.

use serde::Serialize;

use super::Sample;

/// Full contents of one resolution bucket, oldest point first.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSnapshot {
    pub name: String,
    pub interval_seconds: u64,
    pub capacity: usize,
    pub history: Vec<Sample>,
}

/// Bucket metadata without its points (GET /buckets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSummary {
    pub name: String,
    #[serde(rename = "record_interval")]
    pub interval_seconds: u64,
    #[serde(rename = "index_size")]
    pub capacity: usize,
    pub length: usize,
}
