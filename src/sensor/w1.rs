// 1-wire (DS18B20) readings via the w1-gpio kernel driver.
//
// w1_slave looks like:
//   72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
//   72 01 4b 46 7f ff 0e 10 57 t=23125

use std::path::{Path, PathBuf};

use anyhow::Context;

const W1_DEVICES_DIR: &str = "/sys/bus/w1/devices";

pub fn w1_slave_path(device: &str) -> PathBuf {
    Path::new(W1_DEVICES_DIR).join(device).join("w1_slave")
}

pub fn read_w1_slave(path: &Path) -> anyhow::Result<f64> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_w1_slave(&content)
}

/// Parses w1_slave content into degrees Celsius. Rejects readings with a failed CRC.
pub fn parse_w1_slave(content: &str) -> anyhow::Result<f64> {
    let mut lines = content.lines();
    let crc_line = lines.next().context("w1_slave is empty")?;
    anyhow::ensure!(
        crc_line.trim_end().ends_with("YES"),
        "w1_slave CRC check failed: {:?}",
        crc_line
    );
    let data_line = lines.next().context("w1_slave has no data line")?;
    let (_, raw) = data_line
        .rsplit_once("t=")
        .with_context(|| format!("w1_slave data line has no t= field: {:?}", data_line))?;
    let millidegrees: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("w1_slave t= is not an integer: {:?}", raw))?;
    Ok(millidegrees as f64 / 1000.0)
}
