//! Inspect the merged configuration and where it came from

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::{ConfigLoader, KbvConfig};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the merged configuration as TOML
    Show,
    /// Print config file locations and the store and audit targets
    Path,
}

pub fn run(args: ConfigArgs, config: &KbvConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => print!("{}", render_config(config)?),
        ConfigCommands::Path => {
            let user = ConfigLoader::user_config_path();
            let project = ConfigLoader::project_config_path();
            print!("{}", render_paths(config, user.as_deref(), &project));
        }
    }
    Ok(())
}

fn render_config(config: &KbvConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

fn render_paths(config: &KbvConfig, user: Option<&Path>, project: &Path) -> String {
    let store = match &config.store.path {
        Some(path) => path.display().to_string(),
        None => "in-memory (not persisted)".to_string(),
    };
    let audit = match &config.audit.path {
        Some(path) => path.display().to_string(),
        None => "tracing log (target \"audit\")".to_string(),
    };

    format!(
        "User config:    {}\nProject config: {}\nStore file:     {}\nAudit log:      {}\n",
        config_file(user),
        config_file(Some(project)),
        store,
        audit,
    )
}

fn config_file(path: Option<&Path>) -> String {
    match path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (missing)", path.display()),
        None => "unavailable".to_string(),
    }
}
