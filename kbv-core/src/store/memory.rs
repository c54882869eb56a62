//! In-memory saved-questions store

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SaveOutcome, SavedQuestionsItem, SavedQuestionsStore};
use crate::error::StoreError;
use crate::questions::{Question, SavedQuestionsState};

/// Arguments of one `save_questions` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCall {
    pub session_id: String,
    pub session_ttl: i64,
    pub correlation_id: String,
    pub questions: Vec<Question>,
}

/// Store backed by a map, also used as a recording test double
///
/// Expired records are not hidden from reads; call
/// [`purge_expired`](Self::purge_expired) to drop them.
#[derive(Default)]
pub struct MemoryQuestionStore {
    items: RwLock<HashMap<String, SavedQuestionsItem>>,
    save_calls: Mutex<Vec<SaveCall>>,
    lookups: Mutex<Vec<String>>,
    save_failure: Mutex<Option<String>>,
    read_failure: Mutex<Option<String>>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the conditional save
    pub async fn insert(&self, item: SavedQuestionsItem) {
        self.items
            .write()
            .await
            .insert(item.session_id.clone(), item);
    }

    pub async fn get(&self, session_id: &str) -> Option<SavedQuestionsItem> {
        self.items.read().await.get(session_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Drop records whose expiry is at or before `now`, returning how many went
    pub async fn purge_expired(&self, now: i64) -> usize {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|_, item| !item.is_expired(now));
        before - items.len()
    }

    /// Make every later save fail with `message`
    pub fn fail_saves_with(&self, message: impl Into<String>) {
        *lock(&self.save_failure) = Some(message.into());
    }

    /// Make every later lookup fail with `message`
    pub fn fail_reads_with(&self, message: impl Into<String>) {
        *lock(&self.read_failure) = Some(message.into());
    }

    pub fn save_calls(&self) -> Vec<SaveCall> {
        lock(&self.save_calls).clone()
    }

    /// Session ids passed to each lookup
    pub fn lookups(&self) -> Vec<String> {
        lock(&self.lookups).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl SavedQuestionsStore for MemoryQuestionStore {
    async fn get_existing_saved_item(
        &self,
        session_id: &str,
    ) -> Result<Option<SavedQuestionsState>, StoreError> {
        lock(&self.lookups).push(session_id.to_string());

        if let Some(message) = lock(&self.read_failure).clone() {
            return Err(StoreError::Storage(message));
        }

        let items = self.items.read().await;
        Ok(items.get(session_id).map(SavedQuestionsItem::to_state))
    }

    async fn save_questions(
        &self,
        session_id: &str,
        session_ttl: i64,
        correlation_id: &str,
        questions: &[Question],
    ) -> Result<SaveOutcome, StoreError> {
        lock(&self.save_calls).push(SaveCall {
            session_id: session_id.to_string(),
            session_ttl,
            correlation_id: correlation_id.to_string(),
            questions: questions.to_vec(),
        });

        if let Some(message) = lock(&self.save_failure).clone() {
            return Err(StoreError::Storage(message));
        }

        let mut items = self.items.write().await;
        if items.contains_key(session_id) {
            return Ok(SaveOutcome::AlreadyExists);
        }

        items.insert(
            session_id.to_string(),
            SavedQuestionsItem::new(session_id, session_ttl, correlation_id, questions),
        );
        Ok(SaveOutcome::Saved)
    }
}
