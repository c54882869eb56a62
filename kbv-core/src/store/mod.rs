//! Saved-questions persistence port
//!
//! Records are keyed by session id and carry the session's expiry. A save is
//! conditional: it never overwrites an existing record, so concurrent first
//! retrievals for one session settle on a single winner.

mod file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::questions::{Question, SavedQuestion, SavedQuestionsState};

pub use file::JsonFileQuestionStore;
pub use memory::{MemoryQuestionStore, SaveCall};

/// Result of a conditional save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Another writer stored questions for this session first
    AlreadyExists,
}

/// A persisted record, as written by the fetch step and read by the answer step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuestionsItem {
    pub session_id: String,
    /// Epoch seconds after which the record may be discarded
    pub expiry_date: i64,
    pub correlation_id: String,
    #[serde(default)]
    pub questions: Vec<SavedQuestion>,
}

impl SavedQuestionsItem {
    pub fn new(
        session_id: &str,
        session_ttl: i64,
        correlation_id: &str,
        questions: &[Question],
    ) -> Self {
        let state = SavedQuestionsState::from_questions(correlation_id, questions);
        Self {
            session_id: session_id.to_string(),
            expiry_date: session_ttl,
            correlation_id: state.correlation_id,
            questions: state.questions,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expiry_date <= now
    }

    pub fn to_state(&self) -> SavedQuestionsState {
        SavedQuestionsState {
            correlation_id: self.correlation_id.clone(),
            questions: self.questions.clone(),
        }
    }
}

/// Storage for questions chosen per session
#[async_trait]
pub trait SavedQuestionsStore: Send + Sync {
    /// Look up the questions previously saved for a session
    async fn get_existing_saved_item(
        &self,
        session_id: &str,
    ) -> Result<Option<SavedQuestionsState>, StoreError>;

    /// Save questions for a session unless a record already exists
    async fn save_questions(
        &self,
        session_id: &str,
        session_ttl: i64,
        correlation_id: &str,
        questions: &[Question],
    ) -> Result<SaveOutcome, StoreError>;
}
