//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that returns
//! request and process sweep statistics of the API server.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, instrument};

use crate::health_stats::Endpoint;
use crate::state::SharedState;

// Time conversion constants
const SECONDS_PER_HOUR: f64 = 3600.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Footer text for human-readable HTTP endpoints.
pub const FOOTER_TEXT: &str = "Project: https://github.com/cansp-dev/herakles-dashboard-api | More info: https://www.herakles.now | Support: exporter@herakles.now";

/// Renders uptime in the largest unit that keeps the value readable.
pub fn format_server_uptime(uptime_seconds: u64) -> String {
    let uptime_hours = uptime_seconds as f64 / SECONDS_PER_HOUR;
    if uptime_hours < 1.0 {
        format!("{:.1} minutes", uptime_hours * MINUTES_PER_HOUR)
    } else if uptime_hours < HOURS_PER_DAY {
        format!("{:.1} hours", uptime_hours)
    } else {
        format!("{:.1} days", uptime_hours / HOURS_PER_DAY)
    }
}

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");
    state.health_stats.record_http_request(Endpoint::Other);

    let uptime_str = format_server_uptime(state.health_stats.get_uptime_seconds());
    let table = state.health_stats.render_table();

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; charset=utf-8")],
        format!("OK\n\nUptime: {uptime_str}\n\n{table}\n{FOOTER_TEXT}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_server_uptime() {
        assert_eq!(format_server_uptime(90), "1.5 minutes");
        assert_eq!(format_server_uptime(5400), "1.5 hours");
        assert_eq!(format_server_uptime(129_600), "1.5 days");
    }
}
