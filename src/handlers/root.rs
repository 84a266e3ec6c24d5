//! Root endpoint handler.
//!
//! This module provides the `/` endpoint handler that lists all
//! available endpoints as plain text.

use axum::{extract::State, response::IntoResponse};
use std::fmt::Write as FmtWrite;
use tracing::{debug, instrument};

use crate::handlers::health::FOOTER_TEXT;
use crate::health_stats::Endpoint;
use crate::state::SharedState;

/// Renders the endpoint index.
pub fn render_index(version: &str, uptime_secs: u64, health_enabled: bool) -> String {
    let hours = uptime_secs / 3600;
    let minutes = (uptime_secs % 3600) / 60;
    let seconds = uptime_secs % 60;

    let mut endpoints = vec![
        ("/api/system_info", "CPU, memory, disk, temperature, uptime and I/O rates"),
        ("/api/top_processes", "Busiest processes by CPU since the previous call"),
        ("/api/network_interfaces", "Interfaces with link state and addresses"),
    ];
    if health_enabled {
        endpoints.push(("/health", "API server health statistics"));
    }

    let mut out = String::new();
    writeln!(out, "herakles-dashboard-api {version}").ok();
    writeln!(out, "Uptime: {hours}h {minutes}m {seconds}s").ok();
    writeln!(out).ok();
    writeln!(out, "ENDPOINTS").ok();
    writeln!(out, "---------").ok();
    for (path, description) in endpoints {
        writeln!(out, "{:26} {}", path, description).ok();
    }
    writeln!(out).ok();
    write!(out, "{FOOTER_TEXT}").ok();
    out
}

/// Handler for the root `/` endpoint.
#[instrument(skip(state))]
pub async fn root_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing / request");
    state.health_stats.record_http_request(Endpoint::Other);

    let body = render_index(
        env!("CARGO_PKG_VERSION"),
        state.start_time.elapsed().as_secs(),
        state.config.enable_health.unwrap_or(true),
    );

    ([("Content-Type", "text/plain; charset=utf-8")], body)
}
