// Sensor client: read the local source once per interval and POST it to the server.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::sensor::SensorSource;

/// Body of POST /set_temperature.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingPayload<'a> {
    pub temperature: f64,
    pub hostname: &'a str,
    pub sensor: &'a str,
}

pub struct SensorClient {
    http: reqwest::Client,
    endpoint: String,
    hostname: String,
    source: SensorSource,
    interval: Duration,
}

impl SensorClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            endpoint: set_temperature_url(&config.server_url),
            hostname: config.hostname.clone(),
            source: SensorSource::new(config.source.clone()),
            interval: Duration::from_millis(config.interval_ms),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one reading. Non-2xx responses are errors.
    pub async fn send(&self, temperature: f64) -> anyhow::Result<()> {
        let payload = ReadingPayload {
            temperature,
            hostname: &self.hostname,
            sensor: self.source.name(),
        };
        let response = self.http.post(&self.endpoint).json(&payload).send().await?;
        let status = response.status();
        anyhow::ensure!(status.is_success(), "server responded {}", status);
        Ok(())
    }

    /// Read-and-send loop. A failed read skips the cycle; a failed send is logged.
    /// Returns when `shutdown` resolves.
    pub async fn run(&self, shutdown: impl std::future::Future<Output = ()>) {
        info!(endpoint = %self.endpoint, sensor = self.source.name(), "sensor client started");
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = tick.tick() => self.cycle().await,
                _ = &mut shutdown => break,
            }
        }
        info!("sensor client stopped");
    }

    async fn cycle(&self) {
        let temperature = match self.source.read().await {
            Ok(t) => t,
            Err(e) => {
                error!(error = %e, "reading temperature failed; skipping cycle");
                return;
            }
        };
        debug!(temperature, "temperature read");
        match self.send(temperature).await {
            Ok(()) => info!(temperature, "temperature sent"),
            Err(e) => warn!(error = %e, temperature, "sending temperature failed"),
        }
    }
}

pub fn set_temperature_url(server_url: &str) -> String {
    format!("{}/set_temperature", server_url.trim_end_matches('/'))
}
