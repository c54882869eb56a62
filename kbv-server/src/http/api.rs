//! REST API handlers

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kbv_core::FetchQuestionsResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AppState;

const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Seconds since server started
    pub uptime_seconds: i64,
}

/// Run the handler on the request body
///
/// Always answers 200; an absent or unparsable body is handled as an empty event.
pub async fn fetch_questions(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<FetchQuestionsResponse> {
    let event: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(state.handler.handle(&event).await)
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Prometheus text exposition of the completion counters
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.encode() {
        Ok(text) => ([(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)], text).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
