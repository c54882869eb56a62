use std::path::PathBuf;

use kbv_core::DEFAULT_MINIMUM_QUESTIONS;
use kbv_core::audit::DEFAULT_COMPONENT_ID;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// Default host for the KBV server
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default question-bank request timeout, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 =
    kbv_core::retrieval::DEFAULT_REQUEST_TIMEOUT.as_secs();

/// Default log level when neither `RUST_LOG` nor config sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawKbvConfig {
    #[serde(default)]
    pub server: RawServerConfig,

    #[serde(default)]
    pub questions: RawQuestionsConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub audit: RawAuditConfig,

    #[serde(default)]
    pub logging: RawLoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawQuestionsConfig {
    pub minimum_questions: Option<usize>,
    pub excluded_question_keys: Option<Vec<String>>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAuditConfig {
    pub path: Option<PathBuf>,
    pub component_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLoggingConfig {
    pub format: Option<LogFormat>,
    pub level: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct KbvConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub questions: QuestionsConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: kbv_server::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionsConfig {
    /// Fewest eligible questions for `SufficientQuestions`
    pub minimum_questions: usize,
    /// Question keys never offered to the user
    pub excluded_question_keys: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for QuestionsConfig {
    fn default() -> Self {
        Self {
            minimum_questions: DEFAULT_MINIMUM_QUESTIONS,
            excluded_question_keys: Vec::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Saved-questions storage; no path keeps records in memory
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Audit sink; no path logs events through tracing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub component_id: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: None,
            component_id: DEFAULT_COMPONENT_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
