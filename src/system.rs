//! System-wide metrics collection from /proc filesystem.
//!
//! This module provides functions to read system-wide metrics such as
//! aggregate CPU times, memory usage, uptime and logical CPU count.

use std::fs;

use herakles_dashboard_api::SourceError;

const STAT_PATH: &str = "/proc/stat";
const MEMINFO_PATH: &str = "/proc/meminfo";
const UPTIME_PATH: &str = "/proc/uptime";

/// Aggregate CPU times from the "cpu" line of /proc/stat, in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuStat {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuStat {
    /// Calculate total CPU time (all fields).
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
    }

    /// Calculate non-active time (idle + iowait).
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }

    /// Busy percent of the whole machine between `previous` and `self`,
    /// rounded to one decimal.
    pub fn busy_percent_since(&self, previous: &CpuStat) -> f64 {
        let delta_total = self.total().saturating_sub(previous.total());
        if delta_total == 0 {
            return 0.0;
        }
        let delta_idle = self.idle_total().saturating_sub(previous.idle_total());
        let busy = delta_total.saturating_sub(delta_idle) as f64 / delta_total as f64 * 100.0;
        (busy * 10.0).round() / 10.0
    }
}

/// Parses the aggregate "cpu" line of /proc/stat.
pub fn parse_cpu_stat(content: &str) -> Result<CpuStat, SourceError> {
    let line = content
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| SourceError::parse(STAT_PATH, "no aggregate cpu line"))?;

    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse::<u64>().unwrap_or(0))
        .collect();
    if fields.len() < 7 {
        return Err(SourceError::parse(
            STAT_PATH,
            format!("expected at least 7 cpu fields, got {}", fields.len()),
        ));
    }

    Ok(CpuStat {
        user: fields[0],
        nice: fields[1],
        system: fields[2],
        idle: fields[3],
        iowait: fields[4],
        irq: fields[5],
        softirq: fields[6],
        steal: fields.get(7).copied().unwrap_or(0),
    })
}

/// Reads aggregate CPU statistics from /proc/stat.
pub fn read_cpu_stat() -> Result<CpuStat, SourceError> {
    let content = fs::read_to_string(STAT_PATH).map_err(|e| SourceError::io(STAT_PATH, e))?;
    parse_cpu_stat(&content)
}

/// Memory figures from /proc/meminfo, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub available_bytes: u64,
    pub buffers_bytes: u64,
    pub cached_bytes: u64,
    pub sreclaimable_bytes: u64,
}

impl MemoryInfo {
    /// Memory in use by applications: total minus free, buffers and page
    /// cache (including reclaimable slab).
    pub fn used_bytes(&self) -> u64 {
        let reclaimable = self.buffers_bytes + self.cached_bytes + self.sreclaimable_bytes;
        match self.total_bytes.checked_sub(self.free_bytes + reclaimable) {
            Some(used) => used,
            None => self.total_bytes.saturating_sub(self.free_bytes),
        }
    }

    /// Percent of memory not available for new allocations.
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let unavailable = self.total_bytes.saturating_sub(self.available_bytes) as f64;
        let percent = unavailable / self.total_bytes as f64 * 100.0;
        (percent * 10.0).round() / 10.0
    }
}

/// Parses /proc/meminfo content.
pub fn parse_meminfo(content: &str) -> Result<MemoryInfo, SourceError> {
    let mut info = MemoryInfo::default();
    let mut have_total = false;
    let mut have_available = false;

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(kb) = value.parse::<u64>() else {
            continue;
        };
        let bytes = kb * 1024;

        match key {
            "MemTotal:" => {
                info.total_bytes = bytes;
                have_total = true;
            }
            "MemFree:" => info.free_bytes = bytes,
            "MemAvailable:" => {
                info.available_bytes = bytes;
                have_available = true;
            }
            "Buffers:" => info.buffers_bytes = bytes,
            "Cached:" => info.cached_bytes = bytes,
            "SReclaimable:" => info.sreclaimable_bytes = bytes,
            _ => {}
        }
    }

    if !have_total || !have_available {
        return Err(SourceError::parse(
            MEMINFO_PATH,
            "MemTotal or MemAvailable missing",
        ));
    }
    Ok(info)
}

/// Reads memory information from /proc/meminfo.
pub fn read_memory_info() -> Result<MemoryInfo, SourceError> {
    let content =
        fs::read_to_string(MEMINFO_PATH).map_err(|e| SourceError::io(MEMINFO_PATH, e))?;
    parse_meminfo(&content)
}

/// Reads system uptime from /proc/uptime.
///
/// Returns uptime in seconds.
/// Format: "<uptime_seconds> <idle_seconds>"
pub fn read_uptime() -> Result<f64, SourceError> {
    let content = fs::read_to_string(UPTIME_PATH).map_err(|e| SourceError::io(UPTIME_PATH, e))?;

    content
        .split_whitespace()
        .next()
        .ok_or_else(|| SourceError::parse(UPTIME_PATH, "no fields found"))?
        .parse::<f64>()
        .map_err(|e| SourceError::parse(UPTIME_PATH, e.to_string()))
}

/// Logical CPUs online on the host (not limited by affinity or cgroups).
pub fn logical_cpu_count() -> usize {
    // SAFETY: sysconf is safe to call with _SC_NPROCESSORS_ONLN
    let online = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };
    if online > 0 {
        online as usize
    } else {
        1
    }
}
