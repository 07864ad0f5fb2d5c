//! Tracing subscriber setup
//!
//! Console commands log to stderr. The TUI owns the terminal, so it logs to a
//! file through `tracing-appender` instead.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a log file in this directory
    File(PathBuf),
}

/// Keeps the background file writer alive; drop it at exit to flush
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Build the filter: `RUST_LOG` wins, then `level`
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level))
}

/// Filter for `level`, or the default level if it does not parse
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL))
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a subscriber is
/// already installed.
pub fn init(level: &str, target: &LogTarget) -> Result<LoggingGuard> {
    let filter = env_filter(level);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init()
                .context("failed to install stderr logger")?;
            Ok(LoggingGuard { _file: None })
        }
        LogTarget::File(dir) => {
            let guard = init_file(filter, dir)?;
            tracing::info!("Log file: {}", dir.join(crate::config::LOG_FILE).display());
            Ok(LoggingGuard { _file: Some(guard) })
        }
    }
}

fn init_file(filter: EnvFilter, dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, crate::config::LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("failed to install file logger")?;

    Ok(guard)
}
