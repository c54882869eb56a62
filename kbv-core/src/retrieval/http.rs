//! HTTP question-bank client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Serialize;
use tracing::debug;

use super::QuestionRetrieval;
use crate::error::RetrievalError;
use crate::questions::QuestionsResult;
use crate::session::SessionContext;

/// Default request timeout for question-bank calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct QuestionRequest<'a> {
    nino: &'a str,
}

/// Calls the question bank at the session's `questionsUrl`
#[derive(Debug, Clone)]
pub struct HttpQuestionRetrieval {
    client: reqwest::Client,
}

impl HttpQuestionRetrieval {
    /// Build a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RetrievalError::Transport(format!("failed to build client: {}", e)))?;
        Ok(Self { client })
    }

    /// Use an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuestionRetrieval for HttpQuestionRetrieval {
    async fn retrieve_questions(
        &self,
        context: &SessionContext,
    ) -> Result<QuestionsResult, RetrievalError> {
        debug!(
            session_id = %context.session_id,
            url = %context.questions_url,
            "Requesting questions"
        );

        let response = self
            .client
            .post(&context.questions_url)
            .header(USER_AGENT, &context.user_agent)
            .bearer_auth(&context.bearer_token)
            .json(&QuestionRequest {
                nino: &context.nino,
            })
            .send()
            .await
            .map_err(|e| RetrievalError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<QuestionsResult>()
            .await
            .map_err(|e| RetrievalError::Decode(e.to_string()))
    }
}
