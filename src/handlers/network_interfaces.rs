//! Network interfaces endpoint handler.

use axum::{extract::State, Json};
use std::time::Instant;
use tracing::{debug, instrument};

use crate::collectors::interfaces::{read_interfaces, NetworkInterface};
use crate::handlers::error::ApiError;
use crate::health_stats::Endpoint;
use crate::state::SharedState;

/// Handler for the /api/network_interfaces endpoint.
#[instrument(skip(state))]
pub async fn network_interfaces_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<NetworkInterface>>, ApiError> {
    let start = Instant::now();
    debug!("Processing /api/network_interfaces request");
    state
        .health_stats
        .record_http_request(Endpoint::NetworkInterfaces);

    let result = read_interfaces();
    state
        .health_stats
        .record_request_duration(start.elapsed().as_secs_f64() * 1000.0);

    match result {
        Ok(interfaces) => {
            debug!("Found {} network interfaces", interfaces.len());
            Ok(Json(interfaces))
        }
        Err(e) => {
            state.health_stats.record_failed_request();
            Err(ApiError::Interfaces(e))
        }
    }
}
