//! Question-bank retrieval port

mod http;
mod mock;

use async_trait::async_trait;

use crate::error::RetrievalError;
use crate::questions::QuestionsResult;
use crate::session::SessionContext;

pub use http::{DEFAULT_REQUEST_TIMEOUT, HttpQuestionRetrieval};
pub use mock::MockQuestionRetrieval;

/// Fetches candidate questions for a verified identity
#[async_trait]
pub trait QuestionRetrieval: Send + Sync {
    /// Retrieve a correlation id and candidate questions for the session's nino
    async fn retrieve_questions(
        &self,
        context: &SessionContext,
    ) -> Result<QuestionsResult, RetrievalError>;
}
