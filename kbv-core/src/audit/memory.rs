//! Recording audit sink for tests

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{AuditEventType, AuditExtensions, AuditService};
use crate::error::AuditError;
use crate::session::SessionRecord;

/// Arguments of one `send_audit_event` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditCall {
    pub kind: AuditEventType,
    pub session_item: SessionRecord,
    pub extensions: AuditExtensions,
}

/// Keeps every event in memory; can be told to fail
#[derive(Default)]
pub struct MemoryAuditService {
    calls: Mutex<Vec<AuditCall>>,
    failure: Mutex<Option<String>>,
}

impl MemoryAuditService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record calls but answer each with a write error
    pub fn failing(message: impl Into<String>) -> Self {
        let service = Self::new();
        *service.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
        service
    }

    pub fn calls(&self) -> Vec<AuditCall> {
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
}

#[async_trait]
impl AuditService for MemoryAuditService {
    async fn send_audit_event(
        &self,
        kind: AuditEventType,
        session_item: &SessionRecord,
        extensions: AuditExtensions,
    ) -> Result<(), AuditError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AuditCall {
                kind,
                session_item: session_item.clone(),
                extensions,
            });

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match failure {
            Some(message) => Err(AuditError::Write(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixtures::session_record;

    #[tokio::test]
    async fn records_calls() {
        let sink = MemoryAuditService::new();
        sink.send_audit_event(
            AuditEventType::ThinFileEncountered,
            &session_record(),
            AuditExtensions::insufficient_questions(),
        )
        .await
        .unwrap();

        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, AuditEventType::ThinFileEncountered);
        assert_eq!(calls[0].session_item, session_record());
    }

    #[tokio::test]
    async fn failing_sink_still_records() {
        let sink = MemoryAuditService::failing("queue unavailable");
        let error = sink
            .send_audit_event(
                AuditEventType::ThinFileEncountered,
                &session_record(),
                AuditExtensions::insufficient_questions(),
            )
            .await
            .unwrap_err();

        assert!(error.to_string().contains("queue unavailable"));
        assert_eq!(sink.call_count(), 1);
    }
}
