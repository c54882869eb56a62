use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use directories::ProjectDirs;

use super::types::{
    AuditConfig, DEFAULT_HOST, DEFAULT_LOG_LEVEL, KbvConfig, LoggingConfig, QuestionsConfig,
    RawAuditConfig, RawKbvConfig, RawLoggingConfig, RawQuestionsConfig, RawServerConfig,
    ServerConfig, StoreConfig,
};

/// Env var overriding the project config directory
pub const PROJECT_CONFIG_DIR_ENV: &str = "KBV_PROJECT_CONFIG_DIR";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<KbvConfig> {
        Self::load_from_paths(
            Self::user_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Load and merge the given layers; missing files are skipped
    pub fn load_from_paths(user: Option<&Path>, project: &Path) -> Result<KbvConfig> {
        let mut raw = RawKbvConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(user_path)?);
        }

        // Layer 2: Project config
        if project.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(project)?);
        }

        Self::finalize(raw)
    }

    fn read_raw(path: &Path) -> Result<RawKbvConfig> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kbv").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path, honouring `KBV_PROJECT_CONFIG_DIR`
    pub fn project_config_path() -> PathBuf {
        Self::project_config_path_from(std::env::var(PROJECT_CONFIG_DIR_ENV).ok())
    }

    fn project_config_path_from(dir: Option<String>) -> PathBuf {
        match dir {
            Some(dir) => PathBuf::from(dir).join("config.toml"),
            None => PathBuf::from(".kbv/config.toml"),
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawKbvConfig, overlay: RawKbvConfig) -> RawKbvConfig {
        RawKbvConfig {
            server: RawServerConfig {
                host: overlay.server.host.or(base.server.host),
                port: overlay.server.port.or(base.server.port),
            },
            questions: RawQuestionsConfig {
                minimum_questions: overlay
                    .questions
                    .minimum_questions
                    .or(base.questions.minimum_questions),
                excluded_question_keys: overlay
                    .questions
                    .excluded_question_keys
                    .or(base.questions.excluded_question_keys),
                request_timeout_secs: overlay
                    .questions
                    .request_timeout_secs
                    .or(base.questions.request_timeout_secs),
            },
            store: StoreConfig {
                path: overlay.store.path.or(base.store.path),
            },
            audit: RawAuditConfig {
                path: overlay.audit.path.or(base.audit.path),
                component_id: overlay.audit.component_id.or(base.audit.component_id),
            },
            logging: RawLoggingConfig {
                format: overlay.logging.format.or(base.logging.format),
                level: overlay.logging.level.or(base.logging.level),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawKbvConfig) -> Result<KbvConfig> {
        let questions = QuestionsConfig::default();
        let audit = AuditConfig::default();

        let minimum_questions = raw
            .questions
            .minimum_questions
            .unwrap_or(questions.minimum_questions);
        if minimum_questions < 1 {
            bail!("questions.minimum_questions must be at least 1, got {minimum_questions}");
        }

        Ok(KbvConfig {
            server: ServerConfig {
                host: raw.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: raw.server.port.unwrap_or(kbv_server::DEFAULT_PORT),
            },
            questions: QuestionsConfig {
                minimum_questions,
                excluded_question_keys: raw
                    .questions
                    .excluded_question_keys
                    .unwrap_or(questions.excluded_question_keys),
                request_timeout_secs: raw
                    .questions
                    .request_timeout_secs
                    .unwrap_or(questions.request_timeout_secs),
            },
            store: raw.store,
            audit: AuditConfig {
                path: raw.audit.path,
                component_id: raw.audit.component_id.unwrap_or(audit.component_id),
            },
            logging: LoggingConfig {
                format: raw.logging.format.unwrap_or_default(),
                level: raw
                    .logging
                    .level
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
        })
    }
}
