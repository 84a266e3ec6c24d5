//! Disk I/O statistics collector.
//!
//! This module reads /proc/diskstats and sums the sectors read/written by
//! whole block devices (entries that exist under /sys/block) into host-wide
//! byte counters.

use ahash::AHashMap as HashMap;
use std::fs;
use std::path::Path;

use herakles_dashboard_api::{IoCounters, SourceError};

pub const DISKSTATS_PATH: &str = "/proc/diskstats";

/// The kernel always reports diskstats sectors in 512-byte units.
pub const SECTOR_SIZE: u64 = 512;

/// Disk statistics for a single device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskStats {
    pub sectors_read: u64,
    pub sectors_written: u64,
}

impl DiskStats {
    pub fn read_bytes(&self) -> u64 {
        self.sectors_read.saturating_mul(SECTOR_SIZE)
    }

    pub fn written_bytes(&self) -> u64 {
        self.sectors_written.saturating_mul(SECTOR_SIZE)
    }
}

/// Reads disk statistics for whole devices from /proc/diskstats.
pub fn read_diskstats() -> Result<HashMap<String, DiskStats>, SourceError> {
    let content =
        fs::read_to_string(DISKSTATS_PATH).map_err(|e| SourceError::io(DISKSTATS_PATH, e))?;
    Ok(parse_diskstats(&content, is_whole_device))
}

/// Parses /proc/diskstats content.
///
/// Format: major minor name read_ios read_merges read_sectors read_ticks write_ios write_merges write_sectors ...
/// Only devices accepted by `include` are kept. Virtual block devices such
/// as loop and ram count like any other whole device.
pub fn parse_diskstats<F>(content: &str, include: F) -> HashMap<String, DiskStats>
where
    F: Fn(&str) -> bool,
{
    let mut stats = HashMap::new();

    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 14 {
            continue; // Skip malformed lines
        }

        let device = parts[2];
        if !include(device) {
            continue;
        }

        stats.insert(
            device.to_string(),
            DiskStats {
                sectors_read: parts[5].parse().unwrap_or(0),
                sectors_written: parts[9].parse().unwrap_or(0),
            },
        );
    }

    stats
}

/// Whole disks appear as /sys/block/<name>; partitions do not.
fn is_whole_device(device: &str) -> bool {
    Path::new("/sys/block")
        .join(device.replace('/', "!"))
        .exists()
}

/// Sums all devices into (read bytes, written bytes).
pub fn total_counters(stats: &HashMap<String, DiskStats>) -> IoCounters {
    stats.values().fold(IoCounters::default(), |acc, s| {
        IoCounters::new(
            acc.first.saturating_add(s.read_bytes()),
            acc.second.saturating_add(s.written_bytes()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
   7       0 loop0 50 0 1000 10 0 0 0 0 0 20 10 0 0 0 0
   8       0 sda 12000 300 480000 5000 8000 700 160000 9000 0 12000 14000 0 0 0 0
   8       1 sda1 11000 300 470000 4900 7900 700 150000 8900 0 11000 13800 0 0 0 0
 259       0 nvme0n1 100 0 2000 30 50 0 1000 40 0 60 70 0 0 0 0
";

    fn whole_disks(device: &str) -> bool {
        device == "sda" || device == "nvme0n1"
    }

    #[test]
    fn test_parse_diskstats_skips_partitions() {
        let stats = parse_diskstats(SAMPLE, whole_disks);
        assert_eq!(stats.len(), 2);
        assert!(!stats.contains_key("sda1"));
        assert_eq!(stats["sda"].sectors_read, 480_000);
        assert_eq!(stats["sda"].sectors_written, 160_000);
    }

    #[test]
    fn test_loop_devices_under_sys_block_are_counted() {
        let stats = parse_diskstats(SAMPLE, |device| device != "sda1");
        assert_eq!(stats.len(), 3);
        assert_eq!(stats["loop0"].sectors_read, 1_000);

        let totals = total_counters(&stats);
        assert_eq!(totals.first, (1_000 + 480_000 + 2_000) * SECTOR_SIZE);
    }

    #[test]
    fn test_total_counters_in_bytes() {
        let totals = total_counters(&parse_diskstats(SAMPLE, whole_disks));
        assert_eq!(totals.first, (480_000 + 2_000) * SECTOR_SIZE);
        assert_eq!(totals.second, (160_000 + 1_000) * SECTOR_SIZE);
    }

    #[test]
    fn test_parse_diskstats_malformed_line() {
        let stats = parse_diskstats("8 0 sda 1 2 3", |_| true);
        assert!(stats.is_empty());
    }
}
