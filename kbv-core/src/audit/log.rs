//! Audit sink that writes events to the tracing log

use async_trait::async_trait;
use tracing::info;

use super::{AuditEvent, AuditEventType, AuditExtensions, AuditService};
use crate::error::AuditError;
use crate::session::SessionRecord;

/// Emits each audit event as an `info` record on the `audit` target
pub struct TracingAuditService {
    component_id: String,
}

impl TracingAuditService {
    pub fn new(component_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
        }
    }
}

#[async_trait]
impl AuditService for TracingAuditService {
    async fn send_audit_event(
        &self,
        kind: AuditEventType,
        session_item: &SessionRecord,
        extensions: AuditExtensions,
    ) -> Result<(), AuditError> {
        let event = AuditEvent::new(kind, &self.component_id, session_item, extensions);
        let payload =
            serde_json::to_string(&event).map_err(|e| AuditError::Serialize(e.to_string()))?;

        info!(
            target: "audit",
            event_name = %event.event_name,
            session_id = %event.user.session_id,
            %payload,
            "Audit event"
        );
        Ok(())
    }
}
