//! Question types shared by retrieval, filtering and persistence

mod filter;

use serde::{Deserialize, Serialize};

pub use filter::{PolicyQuestionFilter, QuestionFilter};

/// Tax-year context some question templates require
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_tax_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_tax_year: Option<String>,
}

/// A candidate question from the question bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<QuestionInfo>,
}

impl Question {
    /// Create a question, attaching tax-year info only when a year is given
    pub fn new(
        question_key: impl Into<String>,
        current_tax_year: Option<&str>,
        previous_tax_year: Option<&str>,
    ) -> Self {
        let info = if current_tax_year.is_none() && previous_tax_year.is_none() {
            None
        } else {
            Some(QuestionInfo {
                current_tax_year: current_tax_year.map(str::to_string),
                previous_tax_year: previous_tax_year.map(str::to_string),
            })
        };

        Self {
            question_key: question_key.into(),
            info,
        }
    }
}

/// Result of one question-bank call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsResult {
    /// Provider-issued id tying later answer calls to this retrieval
    pub correlation_id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionsResult {
    pub fn new(correlation_id: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            questions,
        }
    }
}

/// A question as persisted for replay by the answer step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuestion {
    pub question_key: String,
    /// 1-based position in the interview
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<QuestionInfo>,
}

/// Questions previously chosen for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuestionsState {
    pub correlation_id: String,
    #[serde(default)]
    pub questions: Vec<SavedQuestion>,
}

impl SavedQuestionsState {
    /// Number questions in the order given
    pub fn from_questions(correlation_id: impl Into<String>, questions: &[Question]) -> Self {
        let questions = questions
            .iter()
            .zip(1..)
            .map(|(question, order)| SavedQuestion {
                question_key: question.question_key.clone(),
                order,
                info: question.info.clone(),
            })
            .collect();

        Self {
            correlation_id: correlation_id.into(),
            questions,
        }
    }

    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }
}
