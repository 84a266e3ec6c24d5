//! Network interface statistics collector.
//!
//! This module reads per-interface byte counters from /proc/net/dev and
//! sums them into the host-wide totals used for upload/download rates.

use ahash::AHashMap as HashMap;
use std::fs;

use herakles_dashboard_api::{IoCounters, SourceError};

pub const NETDEV_PATH: &str = "/proc/net/dev";

/// Byte counters of a single interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetDevStats {
    pub receive_bytes: u64,
    pub transmit_bytes: u64,
}

/// Reads network interface statistics from /proc/net/dev.
///
/// Returns a HashMap mapping interface names to their statistics.
pub fn read_netdev_stats() -> Result<HashMap<String, NetDevStats>, SourceError> {
    let content = fs::read_to_string(NETDEV_PATH).map_err(|e| SourceError::io(NETDEV_PATH, e))?;
    Ok(parse_netdev(&content))
}

/// Parses the /proc/net/dev format, skipping the two header lines and any
/// malformed rows.
pub fn parse_netdev(content: &str) -> HashMap<String, NetDevStats> {
    let mut stats = HashMap::new();

    for line in content.lines().skip(2) {
        let Some((interface, rest)) = line.split_once(':') else {
            continue;
        };

        let values: Vec<&str> = rest.split_whitespace().collect();
        if values.len() < 16 {
            continue;
        }

        stats.insert(
            interface.trim().to_string(),
            NetDevStats {
                receive_bytes: values[0].parse().unwrap_or(0),
                transmit_bytes: values[8].parse().unwrap_or(0),
            },
        );
    }

    stats
}

/// Sums all interfaces (loopback included) into (sent, received).
pub fn total_counters(stats: &HashMap<String, NetDevStats>) -> IoCounters {
    stats.values().fold(IoCounters::default(), |acc, s| {
        IoCounters::new(
            acc.first.saturating_add(s.transmit_bytes),
            acc.second.saturating_add(s.receive_bytes),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  123456     100    0    0    0     0          0         0   123456     100    0    0    0     0       0          0
  eth0: 9876543    5000    0    2    0     0          0        10  1234567    4000    0    0    0     0       0          0
 bogus: 1 2 3
";

    #[test]
    fn test_parse_netdev() {
        let stats = parse_netdev(SAMPLE);
        assert_eq!(stats.len(), 2);
        assert_eq!(
            stats.get("eth0"),
            Some(&NetDevStats {
                receive_bytes: 9_876_543,
                transmit_bytes: 1_234_567,
            })
        );
    }

    #[test]
    fn test_total_counters_includes_loopback() {
        let totals = total_counters(&parse_netdev(SAMPLE));
        assert_eq!(totals.first, 123_456 + 1_234_567);
        assert_eq!(totals.second, 123_456 + 9_876_543);
    }

    #[test]
    fn test_read_netdev_stats() {
        let result = read_netdev_stats();
        assert!(result.is_ok(), "Failed to read netdev stats: {:?}", result);

        let stats = result.unwrap();
        // Should have at least one interface (lo)
        assert!(stats.contains_key("lo"), "Loopback interface not found");
    }
}
