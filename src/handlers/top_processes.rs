//! Top processes endpoint handler.
//!
//! This module provides the `/api/top_processes` endpoint returning the
//! busiest processes by CPU since the previous request.

use axum::{extract::State, Json};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, instrument};

use herakles_dashboard_api::format::format_percent;
use herakles_dashboard_api::ProcessCpuUsage;

use crate::handlers::error::ApiError;
use crate::health_stats::Endpoint;
use crate::state::SharedState;

/// One entry of the `/api/top_processes` array.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: String,
    pub memory_percent: String,
    pub cmdline: String,
}

impl From<ProcessCpuUsage> for ProcessEntry {
    fn from(usage: ProcessCpuUsage) -> Self {
        Self {
            pid: usage.pid,
            name: usage.name,
            cpu_percent: format_percent(usage.cpu_percent),
            memory_percent: format_percent(usage.memory_percent),
            cmdline: usage.cmdline.join(" "),
        }
    }
}

/// Handler for the /api/top_processes endpoint.
#[instrument(skip(state))]
pub async fn top_processes_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ProcessEntry>>, ApiError> {
    let start = Instant::now();
    debug!("Processing /api/top_processes request");
    state.health_stats.record_http_request(Endpoint::TopProcesses);

    let result = state.engine.top_processes().await;
    state
        .health_stats
        .record_request_duration(start.elapsed().as_secs_f64() * 1000.0);

    let top = match result {
        Ok(top) => top,
        Err(e) => {
            state.health_stats.record_failed_request();
            return Err(e.into());
        }
    };
    state.health_stats.record_sweep(&top.stats);

    Ok(Json(
        top.processes.into_iter().map(ProcessEntry::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_entry_formatting() {
        let entry = ProcessEntry::from(ProcessCpuUsage {
            pid: 42,
            name: "postgres".into(),
            cpu_percent: 7.0,
            memory_percent: 3.14159,
            cmdline: vec!["postgres".into(), "-D".into(), "/var/lib/pg".into()],
        });
        assert_eq!(entry.cpu_percent, "7.0%");
        assert_eq!(entry.memory_percent, "3.1%");
        assert_eq!(entry.cmdline, "postgres -D /var/lib/pg");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["pid"], 42);
        assert_eq!(json["name"], "postgres");
    }

    #[test]
    fn test_empty_cmdline_is_empty_string() {
        let entry = ProcessEntry::from(ProcessCpuUsage {
            pid: 2,
            name: "kthreadd".into(),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            cmdline: Vec::new(),
        });
        assert_eq!(entry.cmdline, "");
    }
}
