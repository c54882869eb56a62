//! HTTP server module

mod api;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub use api::HealthResponse;

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/fetchquestions", post(api::fetch_questions))
        .route("/api/health", get(api::health))
        .route("/metrics", get(api::metrics))
        .with_state(state)
}
