//! Scripted question retrieval for tests

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::QuestionRetrieval;
use crate::error::RetrievalError;
use crate::questions::QuestionsResult;
use crate::session::SessionContext;

/// Retrieval double that replays queued responses and records each call
///
/// An empty queue answers with a provider error.
#[derive(Default)]
pub struct MockQuestionRetrieval {
    responses: Mutex<VecDeque<Result<QuestionsResult, RetrievalError>>>,
    calls: Mutex<Vec<SessionContext>>,
}

impl MockQuestionRetrieval {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for a mock that answers once with `result`
    pub fn returning(result: QuestionsResult) -> Self {
        let mock = Self::new();
        mock.queue_result(result);
        mock
    }

    /// Shortcut for a mock that fails once with `error`
    pub fn failing(error: RetrievalError) -> Self {
        let mock = Self::new();
        mock.queue_error(error);
        mock
    }

    pub fn queue_result(&self, result: QuestionsResult) {
        self.lock_responses().push_back(Ok(result));
    }

    pub fn queue_error(&self, error: RetrievalError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Contexts passed to each call, oldest first
    pub fn calls(&self) -> Vec<SessionContext> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_responses(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<QuestionsResult, RetrievalError>>> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl QuestionRetrieval for MockQuestionRetrieval {
    async fn retrieve_questions(
        &self,
        context: &SessionContext,
    ) -> Result<QuestionsResult, RetrievalError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(context.clone());

        self.lock_responses().pop_front().unwrap_or_else(|| {
            Err(RetrievalError::Provider(
                "No queued response in MockQuestionRetrieval".into(),
            ))
        })
    }
}
