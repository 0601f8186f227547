//! File logging. The TUI owns the terminal, so tracing output goes to a daily
//! rolling file under the platform data directory instead of stderr.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that overrides the log filter.
pub const LOG_ENV_VAR: &str = "ARTWORKS_LOG";
const LOG_FILE_PREFIX: &str = "artworks-table.log";

/// Resolve `<data dir>/logs`, `None` when the platform has no data directory.
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "artworks-table").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Install the global subscriber. The returned guard flushes the background
/// writer on drop and has to live until the app exits.
///
/// `ARTWORKS_LOG` wins over `default_filter` when set. Without a data
/// directory the app runs unlogged and `None` is returned.
pub fn init(default_filter: &str) -> Result<Option<WorkerGuard>> {
    init_in(log_dir(), default_filter)
}

fn init_in(dir: Option<PathBuf>, default_filter: &str) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("invalid log filter")?;

    let Some(dir) = dir else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).context("failed to create log directory")?;

    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(Some(guard))
}
