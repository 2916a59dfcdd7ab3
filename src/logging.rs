//! Tracing setup. The release build has no console, so events go to
//! `lapkeys.log` next to the settings file.

use std::path::Path;

use thiserror::Error;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "lapkeys";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to open log file: {0}")]
    Appender(String),
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// `RUST_LOG` when set, otherwise `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to `<dir>/lapkeys.log`. Writes are
/// synchronous so nothing is lost when the tray exits the process directly.
pub fn init_file_logging(dir: &Path) -> Result<(), LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::Directory {
        path: dir.display().to_string(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| LoggingError::Appender(e.to_string()))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(appender).with_ansi(false))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

/// Fallback when the log file cannot be opened.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
