//! Shared application state for the KBV server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kbv_core::{FetchQuestionsHandler, PrometheusMetricsProbe};

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<FetchQuestionsHandler>,
    /// Same probe the handler reports to, exposed on `/metrics`
    pub metrics: Arc<PrometheusMetricsProbe>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(handler: Arc<FetchQuestionsHandler>, metrics: Arc<PrometheusMetricsProbe>) -> Self {
        Self {
            handler,
            metrics,
            started_at: Utc::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
