//! Permissive CORS for browser dashboards.
//!
//! Every response carries `Access-Control-Allow-Origin: *`. Preflight
//! `OPTIONS` requests are answered directly with `204 No Content`.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

const ALLOW_METHODS: &str = "GET, OPTIONS";
const MAX_AGE_SECONDS: &str = "86400";

/// Adds the allow-origin header, plus the preflight headers when requested.
pub fn apply_cors_headers(headers: &mut HeaderMap, preflight: bool) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    if preflight {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE_SECONDS),
        );
    }
}

/// Middleware applied with `axum::middleware::from_fn`.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        debug!("Answering CORS preflight for {}", request.uri().path());
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut(), true);
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut(), false);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_response_headers() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, false);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[test]
    fn test_preflight_headers() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, true);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
    }
}
