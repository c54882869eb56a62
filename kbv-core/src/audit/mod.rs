//! Audit events for thin-file outcomes
//!
//! Audit sinks are best-effort: the handler logs a failed send and carries on.

mod jsonl;
mod log;
mod memory;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::session::SessionRecord;

pub use jsonl::JsonlAuditService;
pub use log::TracingAuditService;
pub use memory::{AuditCall, MemoryAuditService};

/// Prefix applied to every event name emitted by this component
pub const AUDIT_EVENT_PREFIX: &str = "IPV_HMRC_KBV_CRI";

/// Default issuer recorded as `component_id`
pub const DEFAULT_COMPONENT_ID: &str = "https://review-hk.account.gov.uk";

/// Outcome reported in the thin-file extension
pub const INSUFFICIENT_QUESTIONS_OUTCOME: &str = "InsufficientQuestions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditEventType {
    /// Too few questions to run an interview for this identity
    ThinFileEncountered,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::ThinFileEncountered => "THIN_FILE_ENCOUNTERED",
        }
    }

    /// Fully qualified event name, e.g. `IPV_HMRC_KBV_CRI_THIN_FILE_ENCOUNTERED`
    pub fn event_name(&self) -> String {
        format!("{}_{}", AUDIT_EVENT_PREFIX, self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HmrcIvqResponse {
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditExtensions {
    #[serde(rename = "hmrcIvqResponse")]
    pub hmrc_ivq_response: HmrcIvqResponse,
}

impl AuditExtensions {
    pub fn outcome(outcome: impl Into<String>) -> Self {
        Self {
            hmrc_ivq_response: HmrcIvqResponse {
                outcome: outcome.into(),
            },
        }
    }

    pub fn insufficient_questions() -> Self {
        Self::outcome(INSUFFICIENT_QUESTIONS_OUTCOME)
    }
}

/// Identity block of an audit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditUser {
    pub user_id: String,
    pub ip_address: String,
    pub session_id: String,
    pub persistent_session_id: String,
    pub govuk_signin_journey_id: String,
}

impl From<&SessionRecord> for AuditUser {
    fn from(record: &SessionRecord) -> Self {
        Self {
            user_id: record.subject.clone(),
            ip_address: record.client_ip_address.clone(),
            session_id: record.session_id.clone(),
            persistent_session_id: record.persistent_session_id.clone(),
            govuk_signin_journey_id: record.client_session_id.clone(),
        }
    }
}

/// Serialized form written by the audit sinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_name: String,
    /// Epoch seconds
    pub timestamp: i64,
    pub event_timestamp_ms: i64,
    pub component_id: String,
    pub user: AuditUser,
    pub extensions: AuditExtensions,
}

impl AuditEvent {
    pub fn new(
        kind: AuditEventType,
        component_id: impl Into<String>,
        record: &SessionRecord,
        extensions: AuditExtensions,
    ) -> Self {
        let now = Utc::now();
        Self {
            event_name: kind.event_name(),
            timestamp: now.timestamp(),
            event_timestamp_ms: now.timestamp_millis(),
            component_id: component_id.into(),
            user: AuditUser::from(record),
            extensions,
        }
    }
}

/// Sink for audit events
#[async_trait]
pub trait AuditService: Send + Sync {
    async fn send_audit_event(
        &self,
        kind: AuditEventType,
        session_item: &SessionRecord,
        extensions: AuditExtensions,
    ) -> Result<(), AuditError>;
}
