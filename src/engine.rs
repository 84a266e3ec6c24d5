//! Shared rate-tracking state for request handlers.
//!
//! `TelemetryEngine` owns one tracker per metric family, each behind its own
//! lock. A request holds the family's lock for the full cycle: pull the
//! snapshot, compute deltas, replace the baseline. Two overlapping requests
//! for the same family are therefore serialized and can never write an older
//! baseline over a newer one. Different families do not block each other.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::rates::{
    top_by_cpu, CounterSnapshot, ProcessCpuTracker, ProcessCpuUsage, SweepStats, Throughput,
    ThroughputTracker,
};
use crate::source::{IoCounters, ProcessRecord, SnapshotSource, SourceError};

/// Result of one process sweep.
#[derive(Debug, Clone)]
pub struct TopProcesses {
    pub processes: Vec<ProcessCpuUsage>,
    pub stats: SweepStats,
}

/// Owner of the network, disk and per-process CPU baselines.
pub struct TelemetryEngine {
    source: Arc<dyn SnapshotSource>,
    network: Mutex<ThroughputTracker>,
    disk: Mutex<ThroughputTracker>,
    processes: Mutex<ProcessCpuTracker>,
    top_n: usize,
}

impl TelemetryEngine {
    /// Creates the engine and primes every baseline from `source`, so the
    /// first request already computes against a real previous sample.
    pub fn new(source: Arc<dyn SnapshotSource>, top_n: usize) -> Result<Self, SourceError> {
        let now = Instant::now();

        let mut network = ThroughputTracker::new();
        network.compute_rates(CounterSnapshot::new(source.network_counters()?, now));

        let mut disk = ThroughputTracker::new();
        disk.compute_rates(CounterSnapshot::new(source.disk_counters()?, now));

        let mut processes = ProcessCpuTracker::new(now);
        let records = successful_records(source.processes()?);
        processes.sweep(records.0, Instant::now(), source.cpu_count());

        debug!(
            tracked_pids = processes.tracked_pids(),
            "Rate engine baselines primed"
        );

        Ok(Self {
            source,
            network: Mutex::new(network),
            disk: Mutex::new(disk),
            processes: Mutex::new(processes),
            top_n,
        })
    }

    /// Creates the engine without priming; the first call of each family
    /// only establishes its baseline.
    pub fn unprimed(source: Arc<dyn SnapshotSource>, top_n: usize) -> Self {
        Self {
            source,
            network: Mutex::new(ThroughputTracker::new()),
            disk: Mutex::new(ThroughputTracker::new()),
            processes: Mutex::new(ProcessCpuTracker::new(Instant::now())),
            top_n,
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Upload/download rates in bytes per second, plus the raw counters.
    #[instrument(skip(self))]
    pub async fn network_rates(&self) -> Result<(Throughput, IoCounters), SourceError> {
        let mut tracker = self.network.lock().await;
        let counters = self.source.network_counters()?;
        let rates = tracker.compute_rates(CounterSnapshot::new(counters, Instant::now()));
        Ok((rates, counters))
    }

    /// Read/write rates in bytes per second, plus the raw counters.
    #[instrument(skip(self))]
    pub async fn disk_rates(&self) -> Result<(Throughput, IoCounters), SourceError> {
        let mut tracker = self.disk.lock().await;
        let counters = self.source.disk_counters()?;
        let rates = tracker.compute_rates(CounterSnapshot::new(counters, Instant::now()));
        Ok((rates, counters))
    }

    /// Sweeps all processes and returns the busiest `top_n` by CPU percent.
    #[instrument(skip(self))]
    pub async fn top_processes(&self) -> Result<TopProcesses, SourceError> {
        let mut tracker = self.processes.lock().await;
        let listing = self.source.processes()?;
        let cpu_count = self.source.cpu_count();

        let (records, skipped) = successful_records(listing);
        let (usage, mut stats) = tracker.sweep_with_stats(records, Instant::now(), cpu_count);
        drop(tracker);

        stats.skipped = skipped;
        debug!(
            processes = stats.processes,
            new = stats.new_processes,
            skipped = stats.skipped,
            elapsed = stats.elapsed_seconds,
            "Process sweep finished"
        );

        Ok(TopProcesses {
            processes: top_by_cpu(usage, self.top_n),
            stats,
        })
    }
}

/// Drops per-process failures, returning the readable records and how many
/// were skipped.
fn successful_records(
    listing: Vec<Result<ProcessRecord, SourceError>>,
) -> (Vec<ProcessRecord>, usize) {
    let mut skipped = 0;
    let records = listing
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping process during sweep: {}", e);
                skipped += 1;
                None
            }
        })
        .collect();
    (records, skipped)
}
