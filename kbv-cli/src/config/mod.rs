mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::KbvConfig;
#[cfg(test)]
pub use types::{AuditConfig, QuestionsConfig, StoreConfig};
