//! Drop expired records from the saved-questions file

use anyhow::{Result, bail};
use chrono::Utc;
use kbv_core::JsonFileQuestionStore;
use tracing::info;

use crate::config::KbvConfig;

pub async fn run(config: &KbvConfig) -> Result<()> {
    let Some(path) = &config.store.path else {
        bail!("store.path is not configured; the in-memory store has nothing to purge");
    };

    let store = JsonFileQuestionStore::load(path).await?;
    let removed = store.purge_expired(Utc::now().timestamp()).await?;

    info!(path = %path.display(), removed, "Purged expired saved questions");
    println!("Removed {} expired record(s) from {}", removed, path.display());
    Ok(())
}
