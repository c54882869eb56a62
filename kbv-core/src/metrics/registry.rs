//! Prometheus-backed metrics probe
//!
//! Owns a dedicated [`Registry`] that the HTTP `/metrics` route encodes into
//! the text exposition format.

use std::sync::{Mutex, PoisonError};

use prometheus::{
    Encoder, IntCounterVec, Opts, Registry, TextEncoder, register_int_counter_vec_with_registry,
};
use tracing::trace;

use super::{CompletionStatus, HandlerMetric, MetricUnit, MetricsProbe};

/// Counter of finished invocations, labelled by `status`
pub const COMPLETION_COUNTER: &str = "kbv_handler_completion_total";

pub struct PrometheusMetricsProbe {
    registry: Registry,
    completions: IntCounterVec,
    last_status: Mutex<Option<CompletionStatus>>,
}

impl PrometheusMetricsProbe {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let completions = register_int_counter_vec_with_registry!(
            Opts::new(
                COMPLETION_COUNTER,
                "Fetch-questions invocations by completion status"
            ),
            &["status"],
            registry
        )?;

        // Pre-create both series so they export as zero
        for status in [CompletionStatus::Ok, CompletionStatus::Error] {
            completions.with_label_values(&[status.label()]);
        }

        Ok(Self {
            registry,
            completions,
            last_status: Mutex::new(None),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of completions recorded with `status`
    pub fn count(&self, status: CompletionStatus) -> u64 {
        self.completions.with_label_values(&[status.label()]).get()
    }

    /// Most recently captured status, if any
    pub fn last_status(&self) -> Option<CompletionStatus> {
        *self
            .last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Encode the registry in Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl MetricsProbe for PrometheusMetricsProbe {
    fn capture_metric(&self, metric: HandlerMetric, unit: MetricUnit, status: CompletionStatus) {
        trace!(
            metric = metric.as_str(),
            unit = ?unit,
            value = status.value(),
            "Capturing metric"
        );

        match metric {
            HandlerMetric::CompletionStatus => {
                self.completions.with_label_values(&[status.label()]).inc();
            }
        }

        *self
            .last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(status);
    }
}
