//! Snapshot source contract used by the rate engine.
//!
//! The engine never talks to the operating system directly. Everything it
//! needs (cumulative network and disk counters, the process list, the core
//! count) comes through [`SnapshotSource`], so the delta logic can be driven
//! by the live `/proc` reader in production and by synthetic counters in
//! tests.

use std::path::PathBuf;

/// Errors raised while pulling a snapshot from the system.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Metric source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        SourceError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Pair of cumulative byte counters read at one point in time.
///
/// For network counters `first` is bytes sent and `second` bytes received;
/// for disk counters `first` is bytes read and `second` bytes written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoCounters {
    pub first: u64,
    pub second: u64,
}

impl IoCounters {
    pub fn new(first: u64, second: u64) -> Self {
        Self { first, second }
    }
}

/// One process as seen during a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub memory_percent: f64,
    /// Accumulated user + system CPU time in seconds.
    pub cpu_time_seconds: f64,
    pub cmdline: Vec<String>,
}

/// Provider of raw point-in-time counters.
pub trait SnapshotSource: Send + Sync {
    /// Cumulative network bytes (sent, received) summed over all interfaces.
    fn network_counters(&self) -> Result<IoCounters, SourceError>;

    /// Cumulative disk bytes (read, written) summed over all disks.
    fn disk_counters(&self) -> Result<IoCounters, SourceError>;

    /// Enumerates all visible processes.
    ///
    /// The outer error means the enumeration itself failed. Inner errors
    /// belong to a single process (exited mid-read, permission denied) and
    /// are skipped by the caller.
    fn processes(&self) -> Result<Vec<Result<ProcessRecord, SourceError>>, SourceError>;

    /// Logical CPU count.
    fn cpu_count(&self) -> usize;
}
