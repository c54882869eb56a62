//! Question-sufficiency decision engine
//!
//! One call to [`FetchQuestionsHandler::handle`] validates the event, then
//! either resumes from questions already saved for the session or retrieves,
//! filters and saves a fresh set. The outcome is always a value; failures
//! become an error response rather than an `Err`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::audit::{AuditEventType, AuditExtensions, AuditService};
use crate::error::FetchQuestionsError;
use crate::metrics::{CompletionStatus, HandlerMetric, MetricUnit, MetricsProbe};
use crate::questions::{QuestionFilter, SavedQuestionsState};
use crate::retrieval::QuestionRetrieval;
use crate::session::{SessionContext, validate_event};
use crate::store::{SaveOutcome, SavedQuestionsStore};

/// Prefix of every error message returned to callers
pub const HANDLER_NAME: &str = "FetchQuestionsHandler";

/// Fewest eligible questions needed to run an interview
pub const DEFAULT_MINIMUM_QUESTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub minimum_questions: usize,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            minimum_questions: DEFAULT_MINIMUM_QUESTIONS,
        }
    }
}

/// Terminal outcome of a successful invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchQuestionsState {
    SufficientQuestions,
    InsufficientQuestions,
    ContinueSufficientQuestionAlreadyRetrieved,
}

impl FetchQuestionsState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchQuestionsState::SufficientQuestions => "SufficientQuestions",
            FetchQuestionsState::InsufficientQuestions => "InsufficientQuestions",
            FetchQuestionsState::ContinueSufficientQuestionAlreadyRetrieved => {
                "ContinueSufficientQuestionAlreadyRetrieved"
            }
        }
    }

    fn resumed(saved: &SavedQuestionsState) -> Self {
        if saved.has_questions() {
            FetchQuestionsState::ContinueSufficientQuestionAlreadyRetrieved
        } else {
            FetchQuestionsState::InsufficientQuestions
        }
    }
}

/// Invocation result as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FetchQuestionsResponse {
    State {
        #[serde(rename = "fetchQuestionsState")]
        fetch_questions_state: FetchQuestionsState,
    },
    Error {
        error: String,
    },
}

impl FetchQuestionsResponse {
    pub fn state(&self) -> Option<FetchQuestionsState> {
        match self {
            FetchQuestionsResponse::State {
                fetch_questions_state,
            } => Some(*fetch_questions_state),
            FetchQuestionsResponse::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchQuestionsResponse::Error { error } => Some(error),
            FetchQuestionsResponse::State { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchQuestionsResponse::Error { .. })
    }
}

impl From<FetchQuestionsState> for FetchQuestionsResponse {
    fn from(state: FetchQuestionsState) -> Self {
        FetchQuestionsResponse::State {
            fetch_questions_state: state,
        }
    }
}

impl From<&FetchQuestionsError> for FetchQuestionsResponse {
    fn from(err: &FetchQuestionsError) -> Self {
        FetchQuestionsResponse::Error {
            error: format!("{} : {}", HANDLER_NAME, err),
        }
    }
}

/// The fetch-questions decision engine
///
/// Stateless between calls; share it behind an `Arc`.
pub struct FetchQuestionsHandler {
    retrieval: Arc<dyn QuestionRetrieval>,
    filter: Arc<dyn QuestionFilter>,
    store: Arc<dyn SavedQuestionsStore>,
    audit: Arc<dyn AuditService>,
    metrics: Arc<dyn MetricsProbe>,
    config: HandlerConfig,
}

impl FetchQuestionsHandler {
    pub fn new(
        retrieval: Arc<dyn QuestionRetrieval>,
        filter: Arc<dyn QuestionFilter>,
        store: Arc<dyn SavedQuestionsStore>,
        audit: Arc<dyn AuditService>,
        metrics: Arc<dyn MetricsProbe>,
    ) -> Self {
        Self {
            retrieval,
            filter,
            store,
            audit,
            metrics,
            config: HandlerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HandlerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Run one invocation and report exactly one completion metric
    pub async fn handle(&self, event: &Value) -> FetchQuestionsResponse {
        match self.fetch_questions(event).await {
            Ok(state) => {
                self.capture_completion(CompletionStatus::Ok);
                state.into()
            }
            Err(err) => {
                error!(error = %err, "{} failed", HANDLER_NAME);
                self.capture_completion(CompletionStatus::Error);
                FetchQuestionsResponse::from(&err)
            }
        }
    }

    /// Decide the outcome without emitting the completion metric
    pub async fn fetch_questions(
        &self,
        event: &Value,
    ) -> Result<FetchQuestionsState, FetchQuestionsError> {
        let context = validate_event(event)?;

        if let Some(saved) = self
            .store
            .get_existing_saved_item(&context.session_id)
            .await?
        {
            let state = FetchQuestionsState::resumed(&saved);
            info!(
                session_id = %context.session_id,
                saved_questions = saved.questions.len(),
                outcome = state.as_str(),
                "Resuming from saved questions"
            );
            return Ok(state);
        }

        self.first_retrieval(&context).await
    }

    async fn first_retrieval(
        &self,
        context: &SessionContext,
    ) -> Result<FetchQuestionsState, FetchQuestionsError> {
        let result = self.retrieval.retrieve_questions(context).await?;
        let retrieved = result.questions.len();
        let questions = self.filter.filter_questions(result.questions, context);

        let state = if questions.len() < self.config.minimum_questions {
            FetchQuestionsState::InsufficientQuestions
        } else {
            FetchQuestionsState::SufficientQuestions
        };

        debug!(
            session_id = %context.session_id,
            retrieved,
            eligible = questions.len(),
            minimum = self.config.minimum_questions,
            "Applied sufficiency threshold"
        );

        let outcome = self
            .store
            .save_questions(
                &context.session_id,
                context.session_ttl,
                &result.correlation_id,
                &questions,
            )
            .await?;

        if outcome == SaveOutcome::AlreadyExists {
            // Another invocation saved first; its record is authoritative
            if let Some(saved) = self
                .store
                .get_existing_saved_item(&context.session_id)
                .await?
            {
                let state = FetchQuestionsState::resumed(&saved);
                info!(
                    session_id = %context.session_id,
                    outcome = state.as_str(),
                    "Questions already saved by a concurrent request"
                );
                return Ok(state);
            }
            warn!(
                session_id = %context.session_id,
                "Saved questions vanished after a conflicting save"
            );
        }

        if state == FetchQuestionsState::InsufficientQuestions {
            self.send_thin_file_audit(context).await;
        }

        info!(
            session_id = %context.session_id,
            correlation_id = %result.correlation_id,
            outcome = state.as_str(),
            "Questions retrieved"
        );
        Ok(state)
    }

    async fn send_thin_file_audit(&self, context: &SessionContext) {
        if let Err(err) = self
            .audit
            .send_audit_event(
                AuditEventType::ThinFileEncountered,
                &context.session_item,
                AuditExtensions::insufficient_questions(),
            )
            .await
        {
            warn!(
                session_id = %context.session_id,
                error = %err,
                "Failed to send thin-file audit event"
            );
        }
    }

    fn capture_completion(&self, status: CompletionStatus) {
        self.metrics.capture_metric(
            HandlerMetric::CompletionStatus,
            MetricUnit::Count,
            status,
        );
    }
}
