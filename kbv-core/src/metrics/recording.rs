//! Recording metrics probe for tests

use std::sync::{Mutex, PoisonError};

use super::{CompletionStatus, HandlerMetric, MetricUnit, MetricsProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricCall {
    pub metric: HandlerMetric,
    pub unit: MetricUnit,
    pub status: CompletionStatus,
}

#[derive(Default)]
pub struct RecordingMetricsProbe {
    calls: Mutex<Vec<MetricCall>>,
}

impl RecordingMetricsProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MetricCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Statuses captured so far, oldest first
    pub fn statuses(&self) -> Vec<CompletionStatus> {
        self.calls().into_iter().map(|call| call.status).collect()
    }
}

impl MetricsProbe for RecordingMetricsProbe {
    fn capture_metric(&self, metric: HandlerMetric, unit: MetricUnit, status: CompletionStatus) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MetricCall {
                metric,
                unit,
                status,
            });
    }
}
