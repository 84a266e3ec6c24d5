//! Application state management for the API server.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use herakles_dashboard_api::TelemetryEngine;

use crate::config::Config;
use crate::health_stats::HealthStats;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    pub config: Arc<Config>,
    /// Rate baselines for network, disk and per-process CPU.
    pub engine: TelemetryEngine,
    pub health_stats: Arc<HealthStats>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, engine: TelemetryEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            health_stats: Arc::new(HealthStats::new()),
            start_time: Instant::now(),
        }
    }
}
