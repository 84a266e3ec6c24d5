//! Herakles Dashboard API Library
//!
//! This library contains the rate-computation engine behind the dashboard
//! API. It turns cumulative host counters (network bytes, disk bytes,
//! per-process CPU time) sampled at irregular request intervals into
//! per-second rates and CPU percentages.
//!
//! # Features
//!
//! - **Throughput Tracking**: bytes/sec from monotonic byte counters, with counter resets clamped to zero
//! - **Per-Process CPU**: percent of total machine capacity, tolerant to process churn
//! - **Serialized Updates**: one lock per metric family so overlapping requests never lose a baseline
//! - **Pluggable Sources**: all system access goes through the `SnapshotSource` trait
//!
//! # Usage
//!
//! ```rust
//! use herakles_dashboard_api::{CounterSnapshot, IoCounters, ThroughputTracker};
//! use std::time::{Duration, Instant};
//!
//! let mut tracker = ThroughputTracker::new();
//! let t0 = Instant::now();
//!
//! // First call only establishes the baseline
//! let rates = tracker.compute_rates(CounterSnapshot::new(IoCounters::new(0, 0), t0));
//! assert_eq!(rates.first_per_sec, 0.0);
//!
//! let rates = tracker.compute_rates(CounterSnapshot::new(
//!     IoCounters::new(2048, 4096),
//!     t0 + Duration::from_secs(2),
//! ));
//! assert_eq!(rates.first_per_sec, 1024.0);
//! assert_eq!(rates.second_per_sec, 2048.0);
//! ```

pub mod engine;
pub mod format;
pub mod rates;
pub mod source;

// Re-export main types for convenience
pub use engine::{TelemetryEngine, TopProcesses};
pub use rates::{
    CounterSnapshot, ProcessCpuTracker, ProcessCpuUsage, SweepStats, Throughput,
    ThroughputTracker,
};
pub use source::{IoCounters, ProcessRecord, SnapshotSource, SourceError};
