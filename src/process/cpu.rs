//! CPU time parsing for process metrics.
//!
//! This module parses accumulated CPU time from `/proc/<pid>/stat`; the
//! delta computation itself lives in the rate engine.

use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;

use herakles_dashboard_api::SourceError;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    // Fallback to common default for error cases or non-Unix platforms
    100.0
}

/// System clock ticks per second (for CPU time calculation).
pub static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// Extracts utime + stime (in clock ticks) from the content of a stat file.
///
/// The command name may contain spaces and parentheses, so fields are
/// counted from the last ')'.
pub fn parse_stat_ticks(content: &str) -> Option<(u64, u64)> {
    let after_comm = &content[content.rfind(')')? + 1..];
    let fields: Vec<&str> = after_comm.split_whitespace().collect();
    // fields[0] is the state (field 3); utime and stime are fields 14 and 15
    if fields.len() <= 12 {
        return None;
    }
    let utime = fields[11].parse().ok()?;
    let stime = fields[12].parse().ok()?;
    Some((utime, stime))
}

/// Parse total CPU time (user+system) in seconds from /proc/<pid>/stat.
pub fn parse_cpu_time_seconds(proc_path: &Path) -> Result<f64, SourceError> {
    let stat_path = proc_path.join("stat");
    let content = fs::read_to_string(&stat_path).map_err(|e| SourceError::io(&stat_path, e))?;

    let (utime, stime) = parse_stat_ticks(&content)
        .ok_or_else(|| SourceError::parse(&stat_path, "Invalid stat format"))?;

    // Use system-detected clock ticks per second
    Ok((utime + stime) as f64 / *CLK_TCK)
}
