//! Integration tests for the display formatters.

use herakles_dashboard_api::format::{
    format_bytes, format_gb, format_percent, format_speed, format_temperature, format_uptime,
    TempStatus,
};

#[test]
fn test_byte_sizer() {
    assert_eq!(format_bytes(0), "0 Bytes");
    assert_eq!(format_bytes(1536), "1.50 KB");
    assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
    assert_eq!(format_bytes(1024u64.pow(4) * 3 / 2), "1.50 TB");
}

#[test]
fn test_speed_units() {
    assert_eq!(format_speed(500_000.0), "488 KiB/s");
    assert_eq!(format_speed(2_097_152.0), "2.00 MiB/s");
    assert_eq!(format_speed(0.0), "0 KiB/s");
}

#[test]
fn test_gb_and_percent() {
    assert_eq!(format_gb(16 * 1024 * 1024 * 1024), "16.0 GB");
    assert_eq!(format_gb(0), "0.0 GB");
    assert_eq!(format_percent(0.04), "0.0%");
    assert_eq!(format_percent(99.96), "100.0%");
}

#[test]
fn test_uptime() {
    assert_eq!(format_uptime(59), "0 days, 0 hours, 0 minutes");
    assert_eq!(format_uptime(3 * 86_400 + 4 * 3_600 + 5 * 60 + 6), "3 days, 4 hours, 5 minutes");
}

#[test]
fn test_temperature_status_thresholds() {
    assert_eq!(TempStatus::from_celsius(Some(60.0)), TempStatus::Normal);
    assert_eq!(TempStatus::from_celsius(Some(60.1)), TempStatus::Warm);
    assert_eq!(TempStatus::from_celsius(Some(75.0)), TempStatus::Warm);
    assert_eq!(TempStatus::from_celsius(Some(75.1)), TempStatus::High);
    assert_eq!(TempStatus::from_celsius(None), TempStatus::NotAvailable);
    assert_eq!(TempStatus::from_celsius(None).to_string(), "N/A");
}

#[test]
fn test_temperature_status_follows_displayed_value() {
    // Shown as "60.0°C", so it must not be classified as Warm
    assert_eq!(format_temperature(Some(60.04)), "60.0°C");
    assert_eq!(TempStatus::from_celsius(Some(60.04)), TempStatus::Normal);
    assert_eq!(format_temperature(None), "N/A");
}
