use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    #[serde(default)]
    pub publishing: PublishingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Raw history size and the fixed set of resolution buckets.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub raw_capacity: usize,
    #[serde(default)]
    pub buckets: Vec<BucketConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketConfig {
    pub name: String,
    pub interval_seconds: u64,
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Readings buffered per /ws/temperature subscriber before it starts lagging.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

fn default_broadcast_capacity() -> usize {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log history stats at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        self.history.validate()?;
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.raw_capacity > 0,
            "history.raw_capacity must be > 0, got {}",
            self.raw_capacity
        );
        let mut seen = HashSet::new();
        for bucket in &self.buckets {
            anyhow::ensure!(
                !bucket.name.is_empty(),
                "history.buckets.name must be non-empty"
            );
            anyhow::ensure!(
                seen.insert(bucket.name.as_str()),
                "history.buckets.name must be unique, got duplicate {:?}",
                bucket.name
            );
            anyhow::ensure!(
                bucket.interval_seconds > 0,
                "history.buckets.interval_seconds must be > 0 for {:?}",
                bucket.name
            );
            anyhow::ensure!(
                bucket.capacity > 0,
                "history.buckets.capacity must be > 0 for {:?}",
                bucket.name
            );
        }
        Ok(())
    }
}

// --- Sensor client ---

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the server, e.g. "http://localhost:8889".
    pub server_url: String,
    pub hostname: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub debug: bool,
    pub source: SourceConfig,
}

/// Where the client reads its temperature from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// 1-wire sensor: /sys/bus/w1/devices/<device>/w1_slave
    OneWire { device: String },
    /// Hardware component (hwmon) whose label contains `label`, e.g. "amdgpu".
    Component { label: String },
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl ClientConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::load_from_str(&s)
    }

    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: ClientConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server_url.starts_with("http://") || self.server_url.starts_with("https://"),
            "server_url must start with http:// or https://, got {:?}",
            self.server_url
        );
        anyhow::ensure!(!self.hostname.is_empty(), "hostname must be non-empty");
        anyhow::ensure!(
            self.interval_ms > 0,
            "interval_ms must be > 0, got {}",
            self.interval_ms
        );
        anyhow::ensure!(
            self.request_timeout_ms > 0,
            "request_timeout_ms must be > 0, got {}",
            self.request_timeout_ms
        );
        match &self.source {
            SourceConfig::OneWire { device } => {
                anyhow::ensure!(!device.is_empty(), "source.device must be non-empty")
            }
            SourceConfig::Component { label } => {
                anyhow::ensure!(!label.is_empty(), "source.label must be non-empty")
            }
        }
        Ok(())
    }
}
