// Hardware component temperatures (hwmon) via sysinfo.

use sysinfo::Components;

/// First component whose label contains `label` (case-insensitive) and reports a temperature.
pub fn read_component(label: &str) -> anyhow::Result<f64> {
    let needle = label.to_lowercase();
    let components = Components::new_with_refreshed_list();
    for component in components.list() {
        if !component.label().to_lowercase().contains(&needle) {
            continue;
        }
        if let Some(temperature) = component.temperature()
            && temperature.is_finite()
        {
            return Ok(temperature as f64);
        }
    }
    let available: Vec<&str> = components.list().iter().map(|c| c.label()).collect();
    anyhow::bail!(
        "no component matching {:?} reports a temperature (available: {:?})",
        label,
        available
    )
}
