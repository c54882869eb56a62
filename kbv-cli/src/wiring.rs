//! Builds the handler's collaborators from configuration

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use kbv_core::{
    AuditService, FetchQuestionsHandler, HandlerConfig, HttpQuestionRetrieval,
    JsonFileQuestionStore, JsonlAuditService, MemoryQuestionStore, MetricsProbe,
    PolicyQuestionFilter, SavedQuestionsStore, TracingAuditService,
};
use tracing::info;

use crate::config::KbvConfig;

/// Wire a handler reporting to `metrics`
pub async fn build_handler(
    config: &KbvConfig,
    metrics: Arc<dyn MetricsProbe>,
) -> Result<FetchQuestionsHandler> {
    let retrieval = HttpQuestionRetrieval::new(Duration::from_secs(
        config.questions.request_timeout_secs,
    ))?;
    let filter = PolicyQuestionFilter::new(config.questions.excluded_question_keys.iter().cloned());

    Ok(FetchQuestionsHandler::new(
        Arc::new(retrieval),
        Arc::new(filter),
        build_store(config).await?,
        build_audit(config),
        metrics,
    )
    .with_config(HandlerConfig {
        minimum_questions: config.questions.minimum_questions,
    }))
}

async fn build_store(config: &KbvConfig) -> Result<Arc<dyn SavedQuestionsStore>> {
    match &config.store.path {
        Some(path) => {
            info!(path = %path.display(), "Using file question store");
            Ok(Arc::new(JsonFileQuestionStore::load(path).await?))
        }
        None => {
            info!("Using in-memory question store");
            Ok(Arc::new(MemoryQuestionStore::new()))
        }
    }
}

fn build_audit(config: &KbvConfig) -> Arc<dyn AuditService> {
    match &config.audit.path {
        Some(path) => Arc::new(JsonlAuditService::new(path, &config.audit.component_id)),
        None => Arc::new(TracingAuditService::new(&config.audit.component_id)),
    }
}
