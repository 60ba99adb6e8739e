//! tg-todo CLI entry point.

use clap::Parser;
use tgtodo_cli::cli::Cli;
use tgtodo_cli::commands;
use tgtodo_core::config;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    // Env files first so clap's env fallbacks see them
    config::load_env();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = config::ensure_all_dirs() {
        tracing::warn!(error = %e, "Failed to create state directories");
    }

    if let Err(e) = commands::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
