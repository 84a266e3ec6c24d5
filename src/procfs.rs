//! Live snapshot source backed by /proc and /sys.

use rayon::prelude::*;
use std::path::PathBuf;
use tracing::instrument;

use herakles_dashboard_api::{IoCounters, ProcessRecord, SnapshotSource, SourceError};

use crate::collectors::{diskstats, netdev};
use crate::process::{collect_proc_entries, read_process};
use crate::system::{logical_cpu_count, read_memory_info};

/// Reads counters and processes from the running kernel.
pub struct ProcfsSource {
    proc_root: PathBuf,
    max_processes: Option<usize>,
    cpu_count: usize,
}

impl ProcfsSource {
    pub fn new(max_processes: Option<usize>) -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            max_processes,
            cpu_count: logical_cpu_count(),
        }
    }
}

impl SnapshotSource for ProcfsSource {
    fn network_counters(&self) -> Result<IoCounters, SourceError> {
        Ok(netdev::total_counters(&netdev::read_netdev_stats()?))
    }

    fn disk_counters(&self) -> Result<IoCounters, SourceError> {
        Ok(diskstats::total_counters(&diskstats::read_diskstats()?))
    }

    #[instrument(skip(self))]
    fn processes(&self) -> Result<Vec<Result<ProcessRecord, SourceError>>, SourceError> {
        let total_memory = read_memory_info()?.total_bytes;
        let entries = collect_proc_entries(&self.proc_root, self.max_processes)?;

        // par_iter keeps enumeration order in the collected Vec
        Ok(entries
            .par_iter()
            .map(|entry| read_process(entry, total_memory))
            .collect())
    }

    fn cpu_count(&self) -> usize {
        self.cpu_count
    }
}
