//! Delta-based rate computation.
//!
//! Converts cumulative counters sampled at irregular intervals into
//! per-second rates:
//! - `ThroughputTracker`: one global pair of byte counters (network or disk)
//! - `ProcessCpuTracker`: accumulated CPU time keyed by PID
//!
//! Both keep the previous sample as their baseline and replace it on every
//! call. Neither fails: anomalies (counter resets, clock not advancing,
//! unseen PIDs) degrade to zero or floored values.

use ahash::AHashMap as HashMap;
use std::time::Instant;

use crate::source::{IoCounters, ProcessRecord};

/// Floor for the elapsed time between two counter snapshots.
pub const MIN_ELAPSED_SECONDS: f64 = 1e-6;

/// Floor for the elapsed time between two process sweeps.
pub const MIN_SWEEP_SECONDS: f64 = 0.01;

/// Counter values together with the instant they were read.
#[derive(Debug, Clone, Copy)]
pub struct CounterSnapshot {
    pub counters: IoCounters,
    pub taken_at: Instant,
}

impl CounterSnapshot {
    pub fn new(counters: IoCounters, taken_at: Instant) -> Self {
        Self { counters, taken_at }
    }
}

/// Bytes per second in both directions of a counter pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Throughput {
    /// Upload (network) or read (disk) rate.
    pub first_per_sec: f64,
    /// Download (network) or write (disk) rate.
    pub second_per_sec: f64,
}

/// Rate of a monotonic counter, `0.0` when the counter went backwards.
pub fn counter_rate(previous: u64, current: u64, elapsed_seconds: f64) -> f64 {
    match current.checked_sub(previous) {
        Some(delta) => delta as f64 / elapsed_seconds,
        None => 0.0,
    }
}

/// Seconds between two instants, floored to `floor`.
pub fn elapsed_seconds(earlier: Instant, later: Instant, floor: f64) -> f64 {
    let dt = later.saturating_duration_since(earlier).as_secs_f64();
    if dt < floor {
        floor
    } else {
        dt
    }
}

/// Tracks one pair of cumulative byte counters.
#[derive(Debug, Default)]
pub struct ThroughputTracker {
    baseline: Option<CounterSnapshot>,
}

impl ThroughputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes rates against the stored baseline and stores `current` as the
    /// new baseline. The first call only establishes the baseline.
    pub fn compute_rates(&mut self, current: CounterSnapshot) -> Throughput {
        let rates = match self.baseline {
            None => Throughput::default(),
            Some(previous) => {
                let dt = elapsed_seconds(previous.taken_at, current.taken_at, MIN_ELAPSED_SECONDS);
                Throughput {
                    first_per_sec: counter_rate(
                        previous.counters.first,
                        current.counters.first,
                        dt,
                    ),
                    second_per_sec: counter_rate(
                        previous.counters.second,
                        current.counters.second,
                        dt,
                    ),
                }
            }
        };

        self.baseline = Some(current);
        rates
    }

    pub fn baseline(&self) -> Option<&CounterSnapshot> {
        self.baseline.as_ref()
    }
}

/// CPU usage of one process over the last sweep interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCpuUsage {
    pub pid: u32,
    pub name: String,
    /// Percent of total machine capacity, rounded to one decimal.
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub cmdline: Vec<String>,
}

/// Summary of one sweep, used for self-health reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepStats {
    pub processes: usize,
    pub new_processes: usize,
    pub skipped: usize,
    pub elapsed_seconds: f64,
}

/// Tracks accumulated CPU time per PID between sweeps.
///
/// A single elapsed time is measured per sweep and shared by every process
/// in it.
#[derive(Debug)]
pub struct ProcessCpuTracker {
    previous: HashMap<u32, f64>,
    last_sweep: Instant,
}

impl ProcessCpuTracker {
    pub fn new(started_at: Instant) -> Self {
        Self {
            previous: HashMap::new(),
            last_sweep: started_at,
        }
    }

    /// Computes CPU percent for every record and replaces the tracked map
    /// with exactly the PIDs in `records`.
    pub fn sweep<I>(&mut self, records: I, now: Instant, cpu_count: usize) -> Vec<ProcessCpuUsage>
    where
        I: IntoIterator<Item = ProcessRecord>,
    {
        self.sweep_with_stats(records, now, cpu_count).0
    }

    pub fn sweep_with_stats<I>(
        &mut self,
        records: I,
        now: Instant,
        cpu_count: usize,
    ) -> (Vec<ProcessCpuUsage>, SweepStats)
    where
        I: IntoIterator<Item = ProcessRecord>,
    {
        let dt = elapsed_seconds(self.last_sweep, now, MIN_SWEEP_SECONDS);
        let mut current: HashMap<u32, f64> = HashMap::new();
        let mut usage = Vec::new();
        let mut stats = SweepStats {
            elapsed_seconds: dt,
            ..SweepStats::default()
        };

        for record in records {
            current.insert(record.pid, record.cpu_time_seconds);

            let cpu_percent = match self.previous.get(&record.pid) {
                Some(&previous_time) => cpu_percent(previous_time, record.cpu_time_seconds, dt, cpu_count),
                None => {
                    stats.new_processes += 1;
                    0.0
                }
            };

            usage.push(ProcessCpuUsage {
                pid: record.pid,
                name: record.name,
                cpu_percent,
                memory_percent: record.memory_percent,
                cmdline: record.cmdline,
            });
        }

        stats.processes = usage.len();
        self.previous = current;
        self.last_sweep = now;

        (usage, stats)
    }

    pub fn tracked_pids(&self) -> usize {
        self.previous.len()
    }

    pub fn is_tracking(&self, pid: u32) -> bool {
        self.previous.contains_key(&pid)
    }
}

/// Percent of total machine capacity used between two CPU-time samples.
pub fn cpu_percent(previous: f64, current: f64, elapsed_seconds: f64, cpu_count: usize) -> f64 {
    if cpu_count == 0 {
        return 0.0;
    }
    let delta = current - previous;
    if delta <= 0.0 {
        return 0.0;
    }
    round_one_decimal((delta / elapsed_seconds) * 100.0 / cpu_count as f64)
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sorts by CPU percent descending (stable for ties) and keeps the first `n`.
pub fn top_by_cpu(mut usage: Vec<ProcessCpuUsage>, n: usize) -> Vec<ProcessCpuUsage> {
    usage.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    usage.truncate(n);
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(pid: u32, cpu_time_seconds: f64) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: format!("proc{pid}"),
            memory_percent: 1.0,
            cpu_time_seconds,
            cmdline: vec![format!("/usr/bin/proc{pid}")],
        }
    }

    #[test]
    fn test_counter_rate_reset_is_zero() {
        assert_eq!(counter_rate(1000, 10, 1.0), 0.0);
        assert_eq!(counter_rate(10, 1010, 2.0), 500.0);
    }

    #[test]
    fn test_elapsed_seconds_floor() {
        let t = Instant::now();
        assert_eq!(elapsed_seconds(t, t, MIN_SWEEP_SECONDS), MIN_SWEEP_SECONDS);
        // Later instant passed as "earlier" never yields a negative value
        let later = t + Duration::from_secs(3);
        assert_eq!(elapsed_seconds(later, t, MIN_ELAPSED_SECONDS), MIN_ELAPSED_SECONDS);
    }

    #[test]
    fn test_throughput_first_call_sets_baseline() {
        let mut tracker = ThroughputTracker::new();
        let t0 = Instant::now();
        let rates = tracker.compute_rates(CounterSnapshot::new(IoCounters::new(500, 900), t0));
        assert_eq!(rates, Throughput::default());
        assert_eq!(tracker.baseline().map(|b| b.counters), Some(IoCounters::new(500, 900)));
    }

    #[test]
    fn test_throughput_same_instant_is_finite() {
        let mut tracker = ThroughputTracker::new();
        let t0 = Instant::now();
        tracker.compute_rates(CounterSnapshot::new(IoCounters::new(0, 0), t0));
        let rates = tracker.compute_rates(CounterSnapshot::new(IoCounters::new(1, 0), t0));
        assert!(rates.first_per_sec.is_finite());
        assert!(rates.first_per_sec > 0.0);
        assert_eq!(rates.second_per_sec, 0.0);
    }

    #[test]
    fn test_cpu_percent_zero_cores() {
        assert_eq!(cpu_percent(1.0, 5.0, 1.0, 0), 0.0);
    }

    #[test]
    fn test_sweep_replaces_tracked_set() {
        let t0 = Instant::now();
        let mut tracker = ProcessCpuTracker::new(t0);
        tracker.sweep(vec![record(1, 1.0), record(2, 1.0)], t0 + Duration::from_secs(1), 1);
        assert_eq!(tracker.tracked_pids(), 2);

        tracker.sweep(vec![record(2, 1.5), record(3, 0.1)], t0 + Duration::from_secs(2), 1);
        assert_eq!(tracker.tracked_pids(), 2);
        assert!(!tracker.is_tracking(1));
        assert!(tracker.is_tracking(3));
    }

    #[test]
    fn test_sweep_stats_count_new_processes() {
        let t0 = Instant::now();
        let mut tracker = ProcessCpuTracker::new(t0);
        tracker.sweep(vec![record(1, 1.0)], t0 + Duration::from_secs(1), 2);
        let (_, stats) = tracker.sweep_with_stats(
            vec![record(1, 2.0), record(7, 0.0)],
            t0 + Duration::from_secs(3),
            2,
        );
        assert_eq!(stats.processes, 2);
        assert_eq!(stats.new_processes, 1);
        assert!((stats.elapsed_seconds - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_by_cpu_stable_ties() {
        let usage: Vec<ProcessCpuUsage> = [(1, 5.0), (2, 9.0), (3, 5.0), (4, 0.0)]
            .iter()
            .map(|&(pid, cpu)| ProcessCpuUsage {
                pid,
                name: String::new(),
                cpu_percent: cpu,
                memory_percent: 0.0,
                cmdline: Vec::new(),
            })
            .collect();

        let top = top_by_cpu(usage, 3);
        let pids: Vec<u32> = top.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 1, 3]);
    }
}
