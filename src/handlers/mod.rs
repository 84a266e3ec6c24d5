//! HTTP endpoint handlers for the API server.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/`: Plain-text endpoint index
//! - `/api/system_info`: Host readings and I/O rates
//! - `/api/top_processes`: Busiest processes by CPU
//! - `/api/network_interfaces`: Interface addresses and link state
//! - `/health`: API server health statistics

pub mod cors;
pub mod error;
pub mod health;
pub mod network_interfaces;
pub mod root;
pub mod system_info;
pub mod top_processes;

use axum::{middleware, routing::get, Router};

// Re-export handlers
pub use cors::cors_middleware;
pub use health::health_handler;
pub use network_interfaces::network_interfaces_handler;
pub use root::root_handler;
pub use system_info::system_info_handler;
pub use top_processes::top_processes_handler;

use crate::state::SharedState;

/// Builds the router for all enabled endpoints.
pub fn build_router(state: SharedState) -> Router {
    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/api/system_info", get(system_info_handler))
        .route("/api/top_processes", get(top_processes_handler))
        .route("/api/network_interfaces", get(network_interfaces_handler));

    if state.config.enable_health.unwrap_or(true) {
        app = app.route("/health", get(health_handler));
    }

    if state.config.enable_cors.unwrap_or(true) {
        app = app.layer(middleware::from_fn(cors_middleware));
    }

    app.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::AppState;
    use herakles_dashboard_api::{
        IoCounters, ProcessRecord, SnapshotSource, SourceError, TelemetryEngine,
    };
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    struct FixedSource;

    impl SnapshotSource for FixedSource {
        fn network_counters(&self) -> Result<IoCounters, SourceError> {
            Ok(IoCounters::new(1000, 2000))
        }

        fn disk_counters(&self) -> Result<IoCounters, SourceError> {
            Ok(IoCounters::new(0, 0))
        }

        fn processes(&self) -> Result<Vec<Result<ProcessRecord, SourceError>>, SourceError> {
            Ok(vec![
                Ok(ProcessRecord {
                    pid: 1,
                    name: "init".into(),
                    memory_percent: 0.5,
                    cpu_time_seconds: 10.0,
                    cmdline: vec!["/sbin/init".into()],
                }),
                Err(SourceError::Unavailable("process 2 exited".into())),
            ])
        }

        fn cpu_count(&self) -> usize {
            4
        }
    }

    async fn start_test_server(config: Config) -> std::net::SocketAddr {
        let engine = TelemetryEngine::unprimed(Arc::new(FixedSource), 10);
        let state = Arc::new(AppState::new(config, engine));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        addr
    }

    /// Sends one HTTP/1.1 request and returns the raw response text.
    async fn request(addr: std::net::SocketAddr, method: &str, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let req = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(req.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).to_lowercase()
    }

    #[tokio::test]
    async fn test_top_processes_route_with_cors() {
        let addr = start_test_server(Config::default()).await;
        let response = request(addr, "GET", "/api/top_processes").await;

        assert!(response.starts_with("http/1.1 200"), "{response}");
        assert!(response.contains("access-control-allow-origin: *"));
        assert!(response.contains("\"pid\":1"));
        assert!(response.contains("\"cpu_percent\":\"0.0%\""));
    }

    #[tokio::test]
    async fn test_preflight_returns_no_content() {
        let addr = start_test_server(Config::default()).await;
        let response = request(addr, "OPTIONS", "/api/system_info").await;

        assert!(response.starts_with("http/1.1 204"), "{response}");
        assert!(response.contains("access-control-allow-methods: get, options"));
    }

    #[tokio::test]
    async fn test_cors_and_health_can_be_disabled() {
        let config = Config {
            enable_cors: Some(false),
            enable_health: Some(false),
            ..Config::default()
        };
        let addr = start_test_server(config).await;

        let response = request(addr, "GET", "/").await;
        assert!(response.starts_with("http/1.1 200"));
        assert!(!response.contains("access-control-allow-origin"));

        let response = request(addr, "GET", "/health").await;
        assert!(response.starts_with("http/1.1 404"), "{response}");
    }
}
