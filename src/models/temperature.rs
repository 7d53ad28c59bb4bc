// JSON request/response bodies. Temperatures are rounded to 2 decimals here and only here.

use serde::{Deserialize, Serialize, Serializer};

use super::BucketSnapshot;

/// Round to 2 decimal places for display. Non-finite values pass through unchanged.
pub fn round2(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    (v * 100.0).round() / 100.0
}

fn serialize_rounded<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round2(*v))
}

fn serialize_rounded_vec<S: Serializer>(v: &[f64], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(v.iter().map(|x| round2(*x)))
}

/// Accepts a JSON number or a numeric string ("21.5"). Anything else is not a temperature.
pub fn coerce_temperature(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// POST /set_temperature body. `hostname` and `sensor` are attribution only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestPayload {
    #[serde(default)]
    pub temperature: Option<serde_json::Value>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub sensor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentTemperature {
    #[serde(serialize_with = "serialize_rounded")]
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(serialize_with = "serialize_rounded_vec")]
    pub history: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketPoint {
    #[serde(serialize_with = "serialize_rounded")]
    pub temperature: f64,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSnapshotResponse {
    pub name: String,
    pub index_size: usize,
    pub record_interval: u64,
    pub history: Vec<BucketPoint>,
}

impl From<BucketSnapshot> for BucketSnapshotResponse {
    fn from(snapshot: BucketSnapshot) -> Self {
        Self {
            name: snapshot.name,
            index_size: snapshot.capacity,
            record_interval: snapshot.interval_seconds,
            history: snapshot
                .history
                .iter()
                .map(|s| BucketPoint {
                    temperature: s.value,
                    timestamp: s.timestamp_ms(),
                })
                .collect(),
        }
    }
}

/// One ingested reading as pushed on /ws/temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveReading {
    #[serde(serialize_with = "serialize_rounded")]
    pub temperature: f64,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}
