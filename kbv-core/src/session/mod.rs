//! Session context types
//!
//! A [`SessionContext`] is the typed form of the inbound fetch-questions event,
//! produced by [`validate_event`]. The raw JSON never travels further than the
//! validator.

mod validator;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use validator::{SESSION_RECORD_FIELDS, validate_event};

/// Session record as looked up by the upstream session step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    /// Session expiry, epoch seconds
    pub expiry_date: i64,
    pub client_ip_address: String,
    pub redirect_uri: String,
    /// Journey id of the calling client
    pub client_session_id: String,
    /// Creation time, epoch milliseconds
    pub created_date: i64,
    pub client_id: String,
    pub subject: String,
    pub persistent_session_id: String,
    pub attempt_count: i64,
    pub state: String,
}

/// Validated inputs for one fetch-questions invocation
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
    /// Expiry applied to saved questions, taken from the session record
    pub session_ttl: i64,
    pub questions_url: String,
    pub user_agent: String,
    pub bearer_token: String,
    pub nino: String,
    pub session_item: SessionRecord,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("session_id", &self.session_id)
            .field("session_ttl", &self.session_ttl)
            .field("questions_url", &self.questions_url)
            .field("user_agent", &self.user_agent)
            .field("bearer_token", &"<redacted>")
            .field("nino", &"<redacted>")
            .field("session_item", &self.session_item)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{SessionContext, SessionRecord};

    pub(crate) fn session_record() -> SessionRecord {
        SessionRecord {
            session_id: "665ed4d5-7576-4c4b-84ff-99af3a57ea64".into(),
            expiry_date: 1234,
            client_ip_address: "127.0.0.1".into(),
            redirect_uri: "http://localhost:8085/callback".into(),
            client_session_id: "2d35a412-125e-423e-835e-ca66111a38a1".into(),
            created_date: 1722954983024,
            client_id: "unit-test-clientid".into(),
            subject: "urn:fdc:gov.uk:2022:6dab2b2d-5fcb-43a3-b682-9484db4a2ca5".into(),
            persistent_session_id: "6c33f1e4-70a9-41f6-a335-7bb036edd3ca".into(),
            attempt_count: 0,
            state: "7f42f0cc-1681-4455-872f-dd228103a12e".into(),
        }
    }

    pub(crate) fn session_context() -> SessionContext {
        SessionContext {
            session_id: "sessionId".into(),
            session_ttl: 1234,
            questions_url: "TEST_URL".into(),
            user_agent: "TEST_USER_AGENT".into(),
            bearer_token: "TEST_TOKEN_VALUE".into(),
            nino: "AA000003D".into(),
            session_item: session_record(),
        }
    }
}
