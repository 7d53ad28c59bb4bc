// Sensor client: reads a local temperature source and pushes it to tempserver.
//
// Usage: temp-sensor [CONFIG_PATH]
//   CONFIG_PATH  default: $SENSOR_CONFIG_FILE, then ./sensor.toml

use std::env;

use tempserver::client::SensorClient;
use tempserver::config::ClientConfig;
use tempserver::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .or_else(|| env::var("SENSOR_CONFIG_FILE").ok())
        .unwrap_or_else(|| "sensor.toml".into());
    let config = ClientConfig::load(&path)?;
    logging::init(if config.debug { "debug" } else { "info" });

    let client = SensorClient::new(&config)?;
    client
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    Ok(())
}
