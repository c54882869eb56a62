use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod logging;
mod wiring;

#[derive(Parser)]
#[command(name = "kbv", about = "Knowledge-based verification question service")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Run the handler once on an event file
    Fetch(commands::fetch::FetchArgs),
    /// Remove expired records from the saved-questions file
    Purge,
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::ConfigLoader::load()?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    logging::init_logging(config.logging.format, level);

    match cli.command {
        Commands::Config(args) => commands::config::run(args, &config),
        Commands::Fetch(args) => commands::fetch::run(args, &config).await,
        Commands::Purge => commands::purge::run(&config).await,
        Commands::Serve(args) => commands::serve::run(args, &config).await,
    }
}
