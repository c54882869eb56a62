//! Append-only JSONL audit sink

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{AuditEvent, AuditEventType, AuditExtensions, AuditService};
use crate::error::AuditError;
use crate::session::SessionRecord;

/// Writes one JSON event per line
pub struct JsonlAuditService {
    path: PathBuf,
    component_id: String,
}

impl JsonlAuditService {
    pub fn new(path: impl Into<PathBuf>, component_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component_id: component_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<(), AuditError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuditError::Write(format!("failed to create audit dir: {}", e)))?;
        }
        Ok(())
    }

    /// Read back every event in the file, skipping blank or unparsable lines
    pub async fn read_events(&self) -> Result<Vec<AuditEvent>, AuditError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .await
            .map_err(|e| AuditError::Write(format!("failed to open audit log: {}", e)))?;

        let mut lines = BufReader::new(file).lines();
        let mut events = Vec::new();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| AuditError::Write(format!("failed to read line: {}", e)))?
        {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(event) = serde_json::from_str(&line) {
                events.push(event);
            }
        }

        Ok(events)
    }
}

#[async_trait]
impl AuditService for JsonlAuditService {
    async fn send_audit_event(
        &self,
        kind: AuditEventType,
        session_item: &SessionRecord,
        extensions: AuditExtensions,
    ) -> Result<(), AuditError> {
        let event = AuditEvent::new(kind, &self.component_id, session_item, extensions);
        let mut json =
            serde_json::to_string(&event).map_err(|e| AuditError::Serialize(e.to_string()))?;
        json.push('\n');

        self.ensure_parent_dir().await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AuditError::Write(format!("failed to open audit log: {}", e)))?;

        file.write_all(json.as_bytes())
            .await
            .map_err(|e| AuditError::Write(format!("failed to write event: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| AuditError::Write(format!("failed to flush: {}", e)))?;

        Ok(())
    }
}
