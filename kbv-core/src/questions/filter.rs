//! Question eligibility filtering

use std::collections::HashSet;

use super::Question;
use crate::session::SessionContext;

/// Removes ineligible and duplicate questions from a candidate list
///
/// Implementations must be pure: same input, same output, no I/O.
pub trait QuestionFilter: Send + Sync {
    fn filter_questions(&self, questions: Vec<Question>, context: &SessionContext)
    -> Vec<Question>;
}

/// Filter driven by a configured list of excluded question keys
///
/// Keeps the first occurrence of each `questionKey` and preserves the
/// provider's order.
#[derive(Debug, Clone, Default)]
pub struct PolicyQuestionFilter {
    excluded_keys: HashSet<String>,
}

impl PolicyQuestionFilter {
    pub fn new<I, S>(excluded_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_keys: excluded_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// A filter that only removes duplicates
    pub fn dedup_only() -> Self {
        Self::default()
    }

    pub fn is_excluded(&self, question_key: &str) -> bool {
        self.excluded_keys.contains(question_key)
    }
}

impl QuestionFilter for PolicyQuestionFilter {
    fn filter_questions(
        &self,
        questions: Vec<Question>,
        context: &SessionContext,
    ) -> Vec<Question> {
        let candidates = questions.len();
        let mut seen = HashSet::new();

        let eligible: Vec<Question> = questions
            .into_iter()
            .filter(|q| !self.is_excluded(&q.question_key))
            .filter(|q| seen.insert(q.question_key.clone()))
            .collect();

        tracing::debug!(
            session_id = %context.session_id,
            candidates,
            eligible = eligible.len(),
            "Filtered questions"
        );

        eligible
    }
}
