//! Human-readable rendering of sizes, speeds, percentages and durations.

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

const SIZE_UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

// Temperature thresholds in °C (exclusive lower bounds)
const TEMP_WARM_ABOVE: f64 = 60.0;
const TEMP_HIGH_ABOVE: f64 = 75.0;

/// Placeholder for metrics whose source is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a byte count with base-1024 units and two decimals.
///
/// `0` renders as `"0 Bytes"`, `1536` as `"1.50 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KIB && unit < SIZE_UNITS.len() - 1 {
        value /= KIB;
        unit += 1;
    }

    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Formats a transfer rate: whole KiB/s below 1 MiB/s, otherwise MiB/s with
/// two decimals.
pub fn format_speed(bytes_per_sec: f64) -> String {
    if bytes_per_sec < MIB {
        format!("{:.0} KiB/s", bytes_per_sec / KIB)
    } else {
        format!("{:.2} MiB/s", bytes_per_sec / MIB)
    }
}

/// Formats a byte count as GiB with one decimal, e.g. `"15.5 GB"`.
pub fn format_gb(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / GIB)
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Formats seconds as `"D days, H hours, M minutes"`.
pub fn format_uptime(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    format!("{days} days, {hours} hours, {minutes} minutes")
}

/// Temperature classification reported next to the CPU temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempStatus {
    Normal,
    Warm,
    High,
    NotAvailable,
}

impl TempStatus {
    /// Classifies a reading after rounding it to the displayed precision,
    /// so the status always agrees with the rendered value.
    pub fn from_celsius(celsius: Option<f64>) -> Self {
        match celsius {
            None => TempStatus::NotAvailable,
            Some(c) => {
                let shown = (c * 10.0).round() / 10.0;
                if shown > TEMP_HIGH_ABOVE {
                    TempStatus::High
                } else if shown > TEMP_WARM_ABOVE {
                    TempStatus::Warm
                } else {
                    TempStatus::Normal
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TempStatus::Normal => "Normal",
            TempStatus::Warm => "Warm",
            TempStatus::High => "High",
            TempStatus::NotAvailable => NOT_AVAILABLE,
        }
    }
}

impl std::fmt::Display for TempStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a temperature as `"NN.N°C"` or `"N/A"`.
pub fn format_temperature(celsius: Option<f64>) -> String {
    match celsius {
        Some(c) => format!("{:.1}°C", c),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_unit_boundaries() {
        assert_eq!(format_bytes(1), "1.00 Bytes");
        assert_eq!(format_bytes(1023), "1023.00 Bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(u64::MAX), "16.00 EB");
    }

    #[test]
    fn test_format_speed_boundary() {
        assert_eq!(format_speed(0.0), "0 KiB/s");
        assert_eq!(format_speed(1024.0 * 1024.0 - 1.0), "1024 KiB/s");
        assert_eq!(format_speed(1024.0 * 1024.0), "1.00 MiB/s");
    }

    #[test]
    fn test_format_gb() {
        assert_eq!(format_gb(0), "0.0 GB");
        assert_eq!(format_gb(16 * 1024 * 1024 * 1024), "16.0 GB");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0 days, 0 hours, 0 minutes");
        assert_eq!(format_uptime(90_061), "1 days, 1 hours, 1 minutes");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(Some(48.27)), "48.3°C");
        assert_eq!(format_temperature(None), "N/A");
        assert_eq!(TempStatus::from_celsius(None).as_str(), "N/A");
    }
}
