// Domain models and JSON wire types

mod bucket;
mod sample;
mod temperature;

pub use bucket::{BucketSnapshot, BucketSummary};
pub use sample::Sample;
pub use temperature::{
    BucketPoint, BucketSnapshotResponse, CurrentTemperature, HistoryResponse, IngestPayload,
    LiveReading, coerce_temperature, round2,
};
