// Local temperature sources for the sensor client.

mod component;
mod w1;

pub use component::read_component;
pub use w1::{parse_w1_slave, read_w1_slave, w1_slave_path};

use crate::config::SourceConfig;

/// A configured temperature source. Reads are blocking and run on the blocking pool.
#[derive(Debug, Clone)]
pub struct SensorSource {
    config: SourceConfig,
}

impl SensorSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// Short name used for attribution in the ingest payload.
    pub fn name(&self) -> &str {
        match &self.config {
            SourceConfig::OneWire { device } => device,
            SourceConfig::Component { label } => label,
        }
    }

    /// Reads one temperature in degrees Celsius.
    pub async fn read(&self) -> anyhow::Result<f64> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || match config {
            SourceConfig::OneWire { device } => read_w1_slave(&w1_slave_path(&device)),
            SourceConfig::Component { label } => read_component(&label),
        })
        .await
        .map_err(|e| anyhow::anyhow!("sensor task join: {}", e))?
    }
}
