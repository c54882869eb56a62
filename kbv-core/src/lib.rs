//! KBV fetch-questions core
//!
//! Decides whether enough personal-history questions exist to run a
//! knowledge-based verification interview for a session, and persists the
//! chosen questions so the answer step can replay them.
//!
//! Collaborators are reached through ports, each with production adapters
//! and a recording double:
//!
//! - [`QuestionRetrieval`]: [`HttpQuestionRetrieval`], [`MockQuestionRetrieval`]
//! - [`QuestionFilter`]: [`PolicyQuestionFilter`]
//! - [`SavedQuestionsStore`]: [`JsonFileQuestionStore`], [`MemoryQuestionStore`]
//! - [`AuditService`]: [`JsonlAuditService`], [`TracingAuditService`], [`MemoryAuditService`]
//! - [`MetricsProbe`]: [`PrometheusMetricsProbe`], [`RecordingMetricsProbe`]

pub mod audit;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod questions;
pub mod retrieval;
pub mod session;
pub mod store;

pub use audit::{
    AuditEvent, AuditEventType, AuditExtensions, AuditService, JsonlAuditService,
    MemoryAuditService, TracingAuditService,
};
pub use error::{
    AuditError, FetchQuestionsError, RetrievalError, SessionRecordError, StoreError,
    ValidationError,
};
pub use handler::{
    DEFAULT_MINIMUM_QUESTIONS, FetchQuestionsHandler, FetchQuestionsResponse,
    FetchQuestionsState, HANDLER_NAME, HandlerConfig,
};
pub use metrics::{
    CompletionStatus, HandlerMetric, MetricUnit, MetricsProbe, PrometheusMetricsProbe,
    RecordingMetricsProbe,
};
pub use questions::{
    PolicyQuestionFilter, Question, QuestionFilter, QuestionInfo, QuestionsResult,
    SavedQuestion, SavedQuestionsState,
};
pub use retrieval::{HttpQuestionRetrieval, MockQuestionRetrieval, QuestionRetrieval};
pub use session::{SessionContext, SessionRecord, validate_event};
pub use store::{
    JsonFileQuestionStore, MemoryQuestionStore, SaveOutcome, SavedQuestionsItem,
    SavedQuestionsStore,
};
