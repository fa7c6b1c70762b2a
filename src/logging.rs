//! File-only structured logging. The terminal owns stdout/stderr as its own
//! paint surface, so unlike a typical CLI tool, logs never go there — only
//! to a rolling file.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log directory used by the `vtengine-term` binary: under the
/// system temp dir, since the core has no on-disk state of its own (spec
/// §6: "Persisted state: none").
#[must_use]
pub fn default_log_dir() -> PathBuf { std::env::temp_dir().join("vtengine") }

/// Installs a global file-backed subscriber at the default log location.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the rolling
/// file appender cannot be opened.
pub fn init() -> miette::Result<WorkerGuard> { init_at(&default_log_dir(), "vtengine") }

/// As [`init`], but with an explicit log directory and file name prefix
/// (used by tests and callers that want logs alongside other per-run
/// state).
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the rolling
/// file appender cannot be opened.
pub fn init_at(log_dir: &Path, file_name_prefix: &str) -> miette::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| miette::miette!("could not create log directory {log_dir:?}: {e}"))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, file_name_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| miette::miette!("could not install tracing subscriber: {e}"))?;

    Ok(guard)
}
