//! revscout - layout-agnostic product review scraper
//!
//! Main entry point for the revscout CLI.

mod cli;
mod cmd_config;
mod cmd_crawl;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use revscout_config::ConfigLoader;

use crate::cli::{Cli, Commands};
use crate::cmd_config::handle_config_command;
use crate::cmd_crawl::handle_crawl_command;

/// Get the revscout data directory (~/.revscout).
fn revscout_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".revscout"))
        .unwrap_or_else(|| PathBuf::from(".revscout"))
}

/// Load a `.env` file into the process environment.
///
/// Without an explicit path the file is searched for from the working
/// directory upwards. A missing file is not an error.
fn load_env_file(path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).context("Failed to read .env file"),
    }
}

/// Log filter from `var`, falling back to `info` (or `debug` when verbose).
fn env_filter(var: &str, verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.revscout/logs/ with daily rotation.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let log_dir = revscout_dir().join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("revscout")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)
        .context("Failed to open log file")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the file writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(env_filter(EnvFilter::DEFAULT_ENV, verbose))
        // stdout carries results
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // RUST_LOG may come from .env
    let env_file = load_env_file(None)?;
    init_tracing(cli.verbose)?;
    if let Some(path) = env_file {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let config = ConfigLoader::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Crawl(args) => handle_crawl_command(config, args).await,
        Commands::Config { action } => handle_config_command(action, &config),
    }
}
