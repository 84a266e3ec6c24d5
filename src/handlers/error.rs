//! Error responses for the JSON API endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use herakles_dashboard_api::SourceError;

/// Message returned when interface enumeration fails.
pub const INTERFACES_ERROR: &str = "Failed to retrieve network interfaces";

/// Failures surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A metric source failed while serving system info or top processes.
    #[error("Failed to collect metrics: {0}")]
    Source(#[from] SourceError),

    /// Interface enumeration failed; reported with a structured body.
    #[error("Failed to retrieve network interfaces: {0}")]
    Interfaces(#[source] SourceError),
}

/// Body of a structured error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{}", self);
        match self {
            ApiError::Source(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to collect metrics",
            )
                .into_response(),
            ApiError::Interfaces(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: INTERFACES_ERROR.to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_interfaces_error_body() {
        let err = ApiError::Interfaces(SourceError::Unavailable("getifaddrs failed".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], INTERFACES_ERROR);
        assert!(json["details"]
            .as_str()
            .unwrap()
            .contains("getifaddrs failed"));
    }

    #[test]
    fn test_source_error_is_generic_500() {
        let err = ApiError::from(SourceError::Unavailable("no /proc".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
