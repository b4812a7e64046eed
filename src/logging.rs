//! Logging configuration for tanyarag

use std::path::Path;

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::AppConfig;
use crate::Result;

/// Initialize the logging system with console and daily-rolling file output.
///
/// The level comes from the configuration; `verbose` overrides it to debug.
pub fn init_logging(config: &AppConfig, verbose: bool) -> Result<()> {
    let logs_dir = Path::new("logs");
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    let level = if verbose { "debug" } else { config.log_level() };
    let env_filter = EnvFilter::new(format!("{level},tanyarag={level}"));

    let file_appender = tracing_appender::rolling::daily("logs", "tanyarag.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized with level: {}", level);

    // The guard must outlive the process or buffered file output is lost
    std::mem::forget(guard);

    Ok(())
}

/// Initialize simple console logging for testing
pub fn init_simple_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .try_init();
}
