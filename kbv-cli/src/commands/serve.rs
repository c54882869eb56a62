//! Run the KBV HTTP server in the foreground

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use kbv_core::PrometheusMetricsProbe;
use kbv_server::{AppState, KbvServer, ServerConfig};
use tracing::info;

use crate::config::KbvConfig;
use crate::wiring::build_handler;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    pub host: Option<String>,
}

pub async fn run(args: ServeArgs, config: &KbvConfig) -> Result<()> {
    let server_config = server_config(&args, config);

    let metrics = Arc::new(PrometheusMetricsProbe::new()?);
    let handler = build_handler(config, metrics.clone()).await?;
    let state = AppState::new(Arc::new(handler), metrics);

    info!(
        "Starting kbv server on {}:{}",
        server_config.host, server_config.port
    );
    KbvServer::new(server_config, state).run().await?;
    Ok(())
}

fn server_config(args: &ServeArgs, config: &KbvConfig) -> ServerConfig {
    ServerConfig::new(
        args.host.clone().unwrap_or_else(|| config.server.host.clone()),
        args.port.unwrap_or(config.server.port),
    )
}
