//! Completion metrics
//!
//! Every invocation reports exactly one [`HandlerMetric::CompletionStatus`]
//! sample once its outcome is final.

mod recording;
mod registry;

pub use recording::{MetricCall, RecordingMetricsProbe};
pub use registry::{COMPLETION_COUNTER, PrometheusMetricsProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerMetric {
    CompletionStatus,
}

impl HandlerMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerMetric::CompletionStatus => "CompletionStatus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricUnit {
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionStatus {
    Ok,
    Error,
}

impl CompletionStatus {
    /// Numeric sample value: 1 for OK, 0 for ERROR
    pub fn value(&self) -> u8 {
        match self {
            CompletionStatus::Ok => 1,
            CompletionStatus::Error => 0,
        }
    }

    /// Label used on exported counters
    pub fn label(&self) -> &'static str {
        match self {
            CompletionStatus::Ok => "ok",
            CompletionStatus::Error => "error",
        }
    }
}

/// Sink for handler metrics; must not fail or block
pub trait MetricsProbe: Send + Sync {
    fn capture_metric(&self, metric: HandlerMetric, unit: MetricUnit, status: CompletionStatus);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_values_and_labels() {
        assert_eq!(CompletionStatus::Ok.value(), 1);
        assert_eq!(CompletionStatus::Error.value(), 0);
        assert_eq!(CompletionStatus::Ok.label(), "ok");
        assert_eq!(CompletionStatus::Error.label(), "error");
        assert_eq!(HandlerMetric::CompletionStatus.as_str(), "CompletionStatus");
    }
}
