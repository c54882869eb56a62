//! One-shot invocation of the handler
//!
//! Reads an event from a file (or `-` for stdin) and prints the response JSON.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use kbv_core::{FetchQuestionsResponse, PrometheusMetricsProbe};
use serde_json::Value;

use crate::config::KbvConfig;
use crate::wiring::build_handler;

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Event JSON file, or `-` to read stdin
    pub event: PathBuf,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: FetchArgs, config: &KbvConfig) -> Result<()> {
    let raw = read_event(&args.event)?;
    // Unparsable input reaches the handler as an empty event
    let event: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);

    let metrics = Arc::new(PrometheusMetricsProbe::new()?);
    let handler = build_handler(config, metrics).await?;
    let response = handler.handle(&event).await;

    println!("{}", render(&response, args.pretty)?);
    Ok(())
}

fn read_event(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read event from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))
    }
}

fn render(response: &FetchQuestionsResponse, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    })
}
