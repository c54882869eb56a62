//! JSON-file saved-questions store
//!
//! The file is the source of truth. Every operation re-reads it under the
//! lock, so a `kbv purge` or a second process sharing the path is observed
//! on the next call. Writes go to a temp file in the same directory and are
//! renamed over the original.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use super::{SaveOutcome, SavedQuestionsItem, SavedQuestionsStore};
use crate::error::StoreError;
use crate::questions::{Question, SavedQuestionsState};

type Records = HashMap<String, SavedQuestionsItem>;

/// File-backed store holding every record in one pretty-printed JSON array
pub struct JsonFileQuestionStore {
    items: RwLock<Records>,
    file_path: PathBuf,
}

impl JsonFileQuestionStore {
    /// Load records from `path`, or start empty if the file does not exist
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let file_path = path.into();
        let items = read_records(&file_path).await?;

        debug!(path = %file_path.display(), records = items.len(), "Loaded question store");

        Ok(Self {
            items: RwLock::new(items),
            file_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub async fn len(&self) -> Result<usize, StoreError> {
        let mut items = self.items.write().await;
        self.refresh(&mut items).await?;
        Ok(items.len())
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }

    /// Drop records whose expiry is at or before `now`, returning how many went
    pub async fn purge_expired(&self, now: i64) -> Result<usize, StoreError> {
        let mut items = self.items.write().await;
        self.refresh(&mut items).await?;

        let before = items.len();
        items.retain(|_, item| !item.is_expired(now));
        let removed = before - items.len();

        if removed > 0 {
            self.persist(&items).await?;
        }
        Ok(removed)
    }

    /// Replace the snapshot with what is on disk; callers hold the write lock
    async fn refresh(&self, items: &mut Records) -> Result<(), StoreError> {
        *items = read_records(&self.file_path).await?;
        Ok(())
    }

    /// Write all records to disk; callers hold the write lock
    async fn persist(&self, items: &Records) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Storage(format!("failed to create store dir: {}", e))
            })?;
        }

        let mut records: Vec<&SavedQuestionsItem> = items.values().collect();
        records.sort_by(|a, b| a.session_id.cmp(&b.session_id));

        let content = serde_json::to_string_pretty(&records).map_err(|e| {
            StoreError::Serialization(format!("failed to serialize saved questions: {}", e))
        })?;

        let path = self.file_path.clone();
        tokio::task::spawn_blocking(move || write_replacing(&path, content.as_bytes()))
            .await
            .map_err(|e| StoreError::Storage(format!("failed to write saved questions: {}", e)))?
    }
}

async fn read_records(path: &Path) -> Result<Records, StoreError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => {
            return Err(StoreError::Storage(format!(
                "failed to read saved questions: {}",
                e
            )));
        }
    };

    let records: Vec<SavedQuestionsItem> = serde_json::from_str(&content).map_err(|e| {
        StoreError::Serialization(format!("failed to parse saved questions: {}", e))
    })?;

    Ok(records
        .into_iter()
        .map(|item| (item.session_id.clone(), item))
        .collect())
}

/// Write through a sibling temp file so readers never see a partial array
fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let storage = |e: std::io::Error| {
        StoreError::Storage(format!("failed to write saved questions: {}", e))
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(storage)?;
    temp.write_all(contents).map_err(storage)?;
    temp.as_file().sync_all().map_err(storage)?;
    temp.persist(path).map_err(|e| storage(e.error))?;
    Ok(())
}

#[async_trait]
impl SavedQuestionsStore for JsonFileQuestionStore {
    async fn get_existing_saved_item(
        &self,
        session_id: &str,
    ) -> Result<Option<SavedQuestionsState>, StoreError> {
        let mut items = self.items.write().await;
        self.refresh(&mut items).await?;
        Ok(items.get(session_id).map(SavedQuestionsItem::to_state))
    }

    async fn save_questions(
        &self,
        session_id: &str,
        session_ttl: i64,
        correlation_id: &str,
        questions: &[Question],
    ) -> Result<SaveOutcome, StoreError> {
        let mut items = self.items.write().await;
        self.refresh(&mut items).await?;
        if items.contains_key(session_id) {
            return Ok(SaveOutcome::AlreadyExists);
        }

        items.insert(
            session_id.to_string(),
            SavedQuestionsItem::new(session_id, session_ttl, correlation_id, questions),
        );

        if let Err(e) = self.persist(&items).await {
            items.remove(session_id);
            return Err(e);
        }

        Ok(SaveOutcome::Saved)
    }
}
