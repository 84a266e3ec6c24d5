//! Thermal sensor collector for reading CPU temperature.
//!
//! This module collects temperature readings from:
//! - /sys/class/hwmon/hwmon*/temp*_input (grouped by the device `name` file)
//! - /sys/class/thermal/thermal_zone*/temp (grouped by the zone `type` file)
//!
//! and picks the CPU temperature shown on the dashboard.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const HWMON_BASE: &str = "/sys/class/hwmon";
const THERMAL_BASE: &str = "/sys/class/thermal";

/// Temperature reading with its sensor label.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalReading {
    pub label: String,
    pub temperature_celsius: f64,
}

/// Readings grouped by sensor device name (e.g. "coretemp", "cpu_thermal").
pub type SensorGroups = BTreeMap<String, Vec<ThermalReading>>;

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_millidegrees(path: &Path) -> Option<f64> {
    read_trimmed(path)?
        .parse::<i64>()
        .ok()
        .map(|m| m as f64 / 1000.0)
}

/// Reads all hwmon temperature inputs below `base`.
pub fn read_hwmon_temps(base: &Path) -> SensorGroups {
    let mut groups = SensorGroups::new();

    let Ok(entries) = fs::read_dir(base) else {
        return groups; // No hwmon devices available
    };

    let mut devices: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    devices.sort();

    for path in devices {
        let hwmon_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        if !hwmon_name.starts_with("hwmon") {
            continue;
        }

        let device_name = read_trimmed(&path.join("name")).unwrap_or_else(|| hwmon_name.clone());

        let Ok(dir_entries) = fs::read_dir(&path) else {
            continue;
        };

        let mut inputs: Vec<String> = dir_entries
            .flatten()
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|f| f.starts_with("temp") && f.ends_with("_input"))
            .collect();
        inputs.sort();

        for input in inputs {
            let Some(celsius) = read_millidegrees(&path.join(&input)) else {
                continue;
            };
            let prefix = input.trim_end_matches("_input");
            let label = read_trimmed(&path.join(format!("{prefix}_label"))).unwrap_or_default();

            groups
                .entry(device_name.clone())
                .or_default()
                .push(ThermalReading {
                    label,
                    temperature_celsius: celsius,
                });
        }
    }

    groups
}

/// Reads thermal zones below `base`, keyed by zone type.
pub fn read_thermal_zones(base: &Path) -> SensorGroups {
    let mut groups = SensorGroups::new();

    let Ok(entries) = fs::read_dir(base) else {
        return groups; // No thermal zones available
    };

    let mut zones: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    zones.sort();

    for path in zones {
        let zone_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        if !zone_name.starts_with("thermal_zone") {
            continue;
        }

        let Some(celsius) = read_millidegrees(&path.join("temp")) else {
            continue;
        };
        let zone_type = read_trimmed(&path.join("type")).unwrap_or_else(|| zone_name.clone());

        groups.entry(zone_type).or_default().push(ThermalReading {
            label: String::new(),
            temperature_celsius: celsius,
        });
    }

    groups
}

/// Collects hwmon sensors, adding thermal zones whose type is not already
/// reported by hwmon.
pub fn collect_temperatures() -> SensorGroups {
    let mut all = read_hwmon_temps(Path::new(HWMON_BASE));
    for (name, readings) in read_thermal_zones(Path::new(THERMAL_BASE)) {
        all.entry(name).or_insert(readings);
    }
    all
}

/// Picks the CPU temperature: the "Package id" or "Core 0" entry of
/// `coretemp`, else the first `cpu_thermal` reading.
pub fn select_cpu_temperature(groups: &SensorGroups) -> Option<f64> {
    if let Some(coretemp) = groups.get("coretemp") {
        return coretemp
            .iter()
            .find(|r| r.label.contains("Package id") || r.label.contains("Core 0"))
            .map(|r| r.temperature_celsius);
    }

    groups
        .get("cpu_thermal")
        .and_then(|readings| readings.first())
        .map(|r| r.temperature_celsius)
}

/// CPU temperature in °C, `None` when no known sensor is present.
pub fn read_cpu_temperature() -> Option<f64> {
    let temp = select_cpu_temperature(&collect_temperatures());
    if temp.is_none() {
        debug!("No coretemp or cpu_thermal sensor found");
    }
    temp
}
