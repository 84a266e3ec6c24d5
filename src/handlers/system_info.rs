//! System info endpoint handler.
//!
//! This module provides the `/api/system_info` endpoint: CPU, memory, disk,
//! temperature and uptime readings plus network and disk throughput computed
//! against the previous request.

use axum::{extract::State, Json};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use herakles_dashboard_api::format::{
    format_bytes, format_gb, format_percent, format_speed, format_temperature, format_uptime,
    TempStatus,
};
use herakles_dashboard_api::{IoCounters, SourceError, Throughput};

use crate::collectors::{filesystem, thermal};
use crate::handlers::error::ApiError;
use crate::health_stats::Endpoint;
use crate::state::SharedState;
use crate::system::{self, MemoryInfo};

/// JSON body of `/api/system_info`. Every value is pre-formatted for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SystemInfo {
    pub cpu_percent: String,
    pub cpu_uptime: String,
    pub ram_percent: String,
    pub ram_total_gb: String,
    pub ram_used_gb: String,
    pub cpu_temp: String,
    pub cpu_temp_status: String,
    pub disk_percent: String,
    pub disk_total_gb: String,
    pub disk_used_gb: String,
    pub net_upload_speed: String,
    pub net_download_speed: String,
    pub total_bytes_sent: String,
    pub total_bytes_recv: String,
    pub disk_read_speed: String,
    pub disk_write_speed: String,
}

/// Raw readings gathered for one request.
#[derive(Debug, Clone)]
pub struct HostSample {
    pub cpu_percent: f64,
    pub uptime_seconds: u64,
    pub memory: MemoryInfo,
    pub cpu_temperature: Option<f64>,
    pub disk_usage: filesystem::FilesystemUsage,
    pub network_rates: Throughput,
    pub network_totals: IoCounters,
    pub disk_rates: Throughput,
}

impl From<&HostSample> for SystemInfo {
    fn from(sample: &HostSample) -> Self {
        Self {
            cpu_percent: format_percent(sample.cpu_percent),
            cpu_uptime: format_uptime(sample.uptime_seconds),
            ram_percent: format_percent(sample.memory.percent()),
            ram_total_gb: format_gb(sample.memory.total_bytes),
            ram_used_gb: format_gb(sample.memory.used_bytes()),
            cpu_temp: format_temperature(sample.cpu_temperature),
            cpu_temp_status: TempStatus::from_celsius(sample.cpu_temperature).to_string(),
            disk_percent: format_percent(sample.disk_usage.percent()),
            disk_total_gb: format_gb(sample.disk_usage.total_bytes),
            disk_used_gb: format_gb(sample.disk_usage.used_bytes),
            net_upload_speed: format_speed(sample.network_rates.first_per_sec),
            net_download_speed: format_speed(sample.network_rates.second_per_sec),
            total_bytes_sent: format_bytes(sample.network_totals.first),
            total_bytes_recv: format_bytes(sample.network_totals.second),
            disk_read_speed: format_speed(sample.disk_rates.first_per_sec),
            disk_write_speed: format_speed(sample.disk_rates.second_per_sec),
        }
    }
}

/// Busy percent of the whole machine over `window`.
async fn sample_cpu_percent(window: Duration) -> Result<f64, SourceError> {
    let before = system::read_cpu_stat()?;
    tokio::time::sleep(window).await;
    let after = system::read_cpu_stat()?;
    Ok(after.busy_percent_since(&before))
}

/// Handler for the /api/system_info endpoint.
#[instrument(skip(state))]
pub async fn system_info_handler(
    State(state): State<SharedState>,
) -> Result<Json<SystemInfo>, ApiError> {
    let start = Instant::now();
    debug!("Processing /api/system_info request");
    state.health_stats.record_http_request(Endpoint::SystemInfo);

    let result = collect_sample(&state).await;
    state
        .health_stats
        .record_request_duration(start.elapsed().as_secs_f64() * 1000.0);

    match result {
        Ok(sample) => Ok(Json(SystemInfo::from(&sample))),
        Err(e) => {
            state.health_stats.record_failed_request();
            Err(e.into())
        }
    }
}

async fn collect_sample(state: &SharedState) -> Result<HostSample, SourceError> {
    let window = Duration::from_millis(state.config.cpu_sample_ms());
    let cpu_percent = sample_cpu_percent(window).await?;

    let memory = system::read_memory_info()?;
    let uptime_seconds = system::read_uptime()? as u64;
    let cpu_temperature = thermal::read_cpu_temperature();
    let disk_usage = filesystem::read_usage(state.config.disk_usage_path())?;

    let (network_rates, network_totals) = state.engine.network_rates().await?;
    let (disk_rates, _) = state.engine.disk_rates().await?;

    Ok(HostSample {
        cpu_percent,
        uptime_seconds,
        memory,
        cpu_temperature,
        disk_usage,
        network_rates,
        network_totals,
        disk_rates,
    })
}
