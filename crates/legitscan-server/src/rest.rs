// Copyright 2026 Cortex Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for legitscan.
//!
//! `POST /api/scan` (and `POST /`) takes `{ "target": string }` and answers
//! with a fully populated [`ScanReport`]. `OPTIONS` on the same paths is a
//! bare 200 for CORS preflight; any other method is a JSON 405. Every
//! response carries the permissive CORS headers browsers expect.

use crate::error::ApiError;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use legitscan::{Aggregator, ScanError, ScanReport};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::set_header::SetResponseHeaderLayer;

/// State shared by every request. Holds no per-request data.
pub struct SharedState {
    pub aggregator: Aggregator,
    pub started_at: Instant,
}

impl SharedState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            started_at: Instant::now(),
        }
    }
}

fn cors_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,OPTIONS,PATCH,DELETE,POST,PUT"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(
                "X-Requested-With, X-HTTP-Method-Override, Content-Type, Accept",
            ),
        ),
    ]
}

fn scan_route() -> MethodRouter<Arc<SharedState>> {
    post(handle_scan)
        .options(preflight)
        .fallback(method_not_allowed)
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<SharedState>) -> Router {
    let mut app = Router::new()
        .route("/", scan_route())
        .route("/api/scan", scan_route())
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state);

    // `CorsLayer` refuses a wildcard origin combined with credentials.
    for (name, value) in cors_headers() {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }
    app
}

/// Start the REST API server and run until Ctrl-C / SIGTERM.
pub async fn start(addr: SocketAddr, state: Arc<SharedState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("cannot install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ── Helpers ─────────────────────────────────────────────────────

/// Extract the target string from a raw request body.
///
/// The body is parsed as JSON whatever its content type. An empty body, a
/// missing key and `null` all count as a missing target.
fn extract_target(body: &[u8]) -> Result<String, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest(ScanError::MissingTarget.to_string()));
    }
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON body".to_string()))?;

    match parsed.get("target") {
        None | Some(Value::Null) => Err(ApiError::BadRequest(
            ScanError::MissingTarget.to_string(),
        )),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::BadRequest("Target must be a string".to_string())),
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn handle_scan(
    State(state): State<Arc<SharedState>>,
    body: Bytes,
) -> Result<Json<ScanReport>, ApiError> {
    let target = extract_target(&body)?;
    let development_mode = state.aggregator.config().development_mode;

    // Run on its own task so a panic inside the aggregator becomes a 500
    // instead of a dropped connection.
    let worker = Arc::clone(&state);
    let joined = tokio::task::spawn(async move { worker.aggregator.scan(&target).await }).await;

    match joined {
        Ok(Ok(scan)) => Ok(Json(scan.report)),
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "rejected scan request");
            Err(ApiError::from_scan(e, development_mode))
        }
        Err(e) => Err(ApiError::from_scan(
            ScanError::Internal(format!("scan task failed: {e}")),
            development_mode,
        )),
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn health(State(state): State<Arc<SharedState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(body: &str) -> String {
        extract_target(body.as_bytes()).unwrap_err().to_string()
    }

    #[test]
    fn test_extract_target() {
        assert_eq!(
            extract_target(br#"{"target":"https://example.com"}"#).unwrap(),
            "https://example.com"
        );
        // blank strings are passed through; target validation rejects them
        assert_eq!(extract_target(br#"{"target":""}"#).unwrap(), "");
    }

    #[test]
    fn test_extract_target_errors() {
        assert_eq!(error_of(""), "Missing target parameter");
        assert_eq!(error_of("{}"), "Missing target parameter");
        assert_eq!(error_of(r#"{"target":null}"#), "Missing target parameter");
        assert_eq!(error_of(r#"{"target":42}"#), "Target must be a string");
        assert_eq!(error_of("target=https://x.io"), "Invalid JSON body");
    }
}
