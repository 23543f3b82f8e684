use anyhow::Result;
use clap::Parser;
use mesdoc::{
    app::{config::Config, settings::validate_config, state::AppState},
    cli::Cli,
    download::{DownloadCoordinator, Manifest, SaveToDirectory},
    tui::run_tui,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first to get verbose flag
    let cli = Cli::parse();

    // Set config directory override before anything resolves paths
    if let Some(ref config_dir) = cli.config {
        mesdoc::util::paths::set_config_dir_override(Some(config_dir.clone()));
    }

    // Get logs directory (creates if needed)
    let logs_dir = mesdoc::util::paths::get_logs_dir().unwrap_or_else(|_| PathBuf::from("."));
    std::fs::create_dir_all(&logs_dir).ok();

    // Set up daily rotating file appender; the terminal belongs to the TUI
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "app.jsonl");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Set log level based on verbose flag
    let log_level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };

    // Initialize logging with JSON format for structured logs
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(
                    log_level,
                )),
        )
        .init();

    tracing::info!("Starting mesdoc...");
    if cli.verbose {
        tracing::info!("Verbose logging enabled (TRACE level)");
    }
    tracing::trace!("CLI arguments: {:?}", cli);
    if let Some(ref config_dir) = cli.config {
        tracing::info!("Using config directory override: {:?}", config_dir);
    }

    // Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration, using defaults: {:#}", e);
        Config::default()
    });

    if let Some(months) = cli.months {
        let mut overridden = config.clone();
        overridden.picker.period_count = months;
        match validate_config(&overridden) {
            Ok(()) => config = overridden,
            Err(errors) => {
                for error in &errors {
                    tracing::error!("Invalid --months value: {}", error);
                }
                anyhow::bail!(
                    "--months must be between 1 and {}",
                    mesdoc::app::settings::MAX_PERIOD_COUNT
                );
            }
        }
    }
    tracing::info!("Config loaded: {:?}", config);

    let manifest = Manifest::with_overrides(&config.manifest);
    tracing::info!("Manifest has {} published documents", manifest.len());

    let trigger = SaveToDirectory::new(
        config.storage.published_dir.clone(),
        config.storage.download_dir.clone(),
    );
    let coordinator = DownloadCoordinator::new(manifest, Arc::new(trigger));

    let state = AppState::new(config)?;

    // "now" is read once; the period list stays fixed for this screen
    let now = chrono::Local::now();
    run_tui(state, coordinator, &now).await?;

    Ok(())
}
