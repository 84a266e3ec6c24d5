//! Health statistics for the API server itself.
//!
//! This module tracks request counts and durations per endpoint, and the
//! outcome of process sweeps, and renders them as a plain-text table for
//! the `/health` endpoint.

use std::collections::VecDeque;
use std::fmt::Write as FmtWrite;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use herakles_dashboard_api::SweepStats;

/// Running statistics for a single metric.
#[derive(Clone, Copy, Default)]
pub struct RunningStat {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
            self.last = value;
            self.sum = value;
            self.count = 1;
            return;
        }
        self.count += 1;
        self.sum += value;
        self.last = value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / (self.count as f64)
        }
    }
}

/// Thread-safe wrapper for running statistics.
#[derive(Default)]
pub struct Stat {
    inner: Mutex<RunningStat>,
}

impl Stat {
    pub fn add_sample(&self, value: f64) {
        if let Ok(mut s) = self.inner.lock() {
            s.add(value);
        }
    }

    /// Returns (last, avg, max, min, count).
    pub fn snapshot(&self) -> (f64, f64, f64, f64, u64) {
        if let Ok(s) = self.inner.lock() {
            (s.last, s.avg(), s.max, s.min, s.count)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0)
        }
    }
}

/// Thread-safe circular buffer for tracking HTTP request timestamps.
pub struct RequestTimestamps {
    inner: Mutex<VecDeque<Instant>>,
}

impl Default for RequestTimestamps {
    fn default() -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(1024)),
        }
    }
}

impl RequestTimestamps {
    pub fn record(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            let now = Instant::now();
            guard.push_back(now);
            // Keep only last 10 minutes of timestamps to avoid unbounded growth
            if let Some(cutoff) = now.checked_sub(Duration::from_secs(600)) {
                while guard.front().is_some_and(|&t| t < cutoff) {
                    guard.pop_front();
                }
            }
        }
    }

    pub fn count_last_minute(&self) -> u64 {
        if let Ok(guard) = self.inner.lock() {
            match Instant::now().checked_sub(Duration::from_secs(60)) {
                Some(cutoff) => guard.iter().filter(|&&t| t >= cutoff).count() as u64,
                None => guard.len() as u64,
            }
        } else {
            0
        }
    }
}

/// Endpoints whose calls are counted separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SystemInfo,
    TopProcesses,
    NetworkInterfaces,
    Other,
}

/// Request and sweep statistics for the server.
pub struct HealthStats {
    // HTTP server stats
    pub http_request_timestamps: RequestTimestamps,
    pub request_duration_ms: Stat,
    pub system_info_calls: AtomicU64,
    pub top_processes_calls: AtomicU64,
    pub network_interfaces_calls: AtomicU64,
    pub other_calls: AtomicU64,
    pub failed_requests: AtomicU64,

    // Process sweeps
    pub swept_processes: Stat,
    pub sweep_interval_seconds: Stat,
    pub new_processes: AtomicU64,
    pub skipped_processes: AtomicU64,

    // Timing
    pub start_time: Instant,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self {
            http_request_timestamps: RequestTimestamps::default(),
            request_duration_ms: Stat::default(),
            system_info_calls: AtomicU64::new(0),
            top_processes_calls: AtomicU64::new(0),
            network_interfaces_calls: AtomicU64::new(0),
            other_calls: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            swept_processes: Stat::default(),
            sweep_interval_seconds: Stat::default(),
            new_processes: AtomicU64::new(0),
            skipped_processes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl HealthStats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record_http_request(&self, endpoint: Endpoint) {
        self.http_request_timestamps.record();
        let counter = match endpoint {
            Endpoint::SystemInfo => &self.system_info_calls,
            Endpoint::TopProcesses => &self.top_processes_calls,
            Endpoint::NetworkInterfaces => &self.network_interfaces_calls,
            Endpoint::Other => &self.other_calls,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request_duration(&self, duration_ms: f64) {
        self.request_duration_ms.add_sample(duration_ms);
    }

    pub fn record_failed_request(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep(&self, stats: &SweepStats) {
        self.swept_processes.add_sample(stats.processes as f64);
        self.sweep_interval_seconds.add_sample(stats.elapsed_seconds);
        self.new_processes
            .fetch_add(stats.new_processes as u64, Ordering::Relaxed);
        self.skipped_processes
            .fetch_add(stats.skipped as u64, Ordering::Relaxed);
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn render_table(&self) -> String {
        let (rd_cur, rd_avg, rd_max, rd_min, _) = self.request_duration_ms.snapshot();
        let (sp_cur, sp_avg, sp_max, sp_min, sweeps) = self.swept_processes.snapshot();
        let (si_cur, si_avg, si_max, si_min, _) = self.sweep_interval_seconds.snapshot();

        let left_col = 26usize;
        let col_w = 12usize;

        let mut out = String::new();

        writeln!(out, "HEALTH ENDPOINT - API INTERNAL STATS").ok();
        writeln!(out, "====================================").ok();
        writeln!(out).ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "",
            "current",
            "average",
            "max",
            "min",
            left = left_col,
            col = col_w
        )
        .ok();

        // HTTP section
        writeln!(out).ok();
        writeln!(out, "HTTP SERVER").ok();
        writeln!(out, "-----------").ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "request_duration (ms)",
            format!("{:.2}", rd_cur),
            format!("{:.2}", rd_avg),
            format!("{:.2}", rd_max),
            format!("{:.2}", rd_min),
            left = left_col,
            col = col_w
        )
        .ok();

        // PROCESS SWEEPS section
        writeln!(out).ok();
        writeln!(out, "PROCESS SWEEPS").ok();
        writeln!(out, "--------------").ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "swept_processes",
            format!("{:.0}", sp_cur),
            format!("{:.1}", sp_avg),
            format!("{:.0}", sp_max),
            format!("{:.0}", sp_min),
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "sweep_interval (s)",
            format!("{:.3}", si_cur),
            format!("{:.3}", si_avg),
            format!("{:.3}", si_max),
            format!("{:.3}", si_min),
            left = left_col,
            col = col_w
        )
        .ok();

        // COUNTERS section
        writeln!(out).ok();
        writeln!(out, "COUNTERS").ok();
        writeln!(out, "--------").ok();

        let counters = [
            ("requests_last_minute", self.http_request_timestamps.count_last_minute()),
            ("system_info_calls", self.system_info_calls.load(Ordering::Relaxed)),
            ("top_processes_calls", self.top_processes_calls.load(Ordering::Relaxed)),
            (
                "network_interfaces_calls",
                self.network_interfaces_calls.load(Ordering::Relaxed),
            ),
            ("other_calls", self.other_calls.load(Ordering::Relaxed)),
            ("failed_requests", self.failed_requests.load(Ordering::Relaxed)),
            ("process_sweeps", sweeps),
            ("new_processes", self.new_processes.load(Ordering::Relaxed)),
            ("skipped_processes", self.skipped_processes.load(Ordering::Relaxed)),
        ];
        for (name, value) in counters {
            writeln!(out, "{:left$} | {:>col$}", name, value, left = left_col, col = col_w).ok();
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stat() {
        let mut stat = RunningStat::default();
        assert_eq!(stat.avg(), 0.0);
        stat.add(10.0);
        stat.add(30.0);
        stat.add(20.0);
        assert_eq!(stat.avg(), 20.0);
        assert_eq!(stat.min, 10.0);
        assert_eq!(stat.max, 30.0);
        assert_eq!(stat.last, 20.0);
    }

    #[test]
    fn test_record_http_request_per_endpoint() {
        let stats = HealthStats::new();
        stats.record_http_request(Endpoint::SystemInfo);
        stats.record_http_request(Endpoint::SystemInfo);
        stats.record_http_request(Endpoint::TopProcesses);

        assert_eq!(stats.system_info_calls.load(Ordering::Relaxed), 2);
        assert_eq!(stats.top_processes_calls.load(Ordering::Relaxed), 1);
        assert_eq!(stats.http_request_timestamps.count_last_minute(), 3);
    }

    #[test]
    fn test_record_sweep_and_render() {
        let stats = HealthStats::new();
        stats.record_sweep(&SweepStats {
            processes: 120,
            new_processes: 4,
            skipped: 2,
            elapsed_seconds: 1.5,
        });

        let table = stats.render_table();
        assert!(table.contains("PROCESS SWEEPS"));
        assert!(table.contains("swept_processes"));
        assert_eq!(stats.skipped_processes.load(Ordering::Relaxed), 2);
        assert_eq!(stats.swept_processes.snapshot().4, 1);
    }
}
