use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory the log files are written to
pub const LOG_DIR: &str = "logs";

/// Base name of the daily log file
pub const LOG_FILE: &str = "process_agent.log";

/// Initialize the logging system
/// Logs will be written to the logs/ directory only (no console output)
pub fn init_logging() -> Result<()> {
    std::fs::create_dir_all(LOG_DIR)?;

    // Daily rotation in logs/ folder
    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // Default to INFO level, can be overridden with RUST_LOG env var
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal belongs to the chat, so only the file layer is installed
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging system initialized");
    tracing::info!("Log files location: {}/{}", LOG_DIR, LOG_FILE);

    Ok(())
}
