//! Logging initialization.
//!
//! The terminal belongs to the form, so logs go to
//! `<data dir>/logs/bizcred-tui-{datetime}.log` instead of stderr.

use crate::config::AppConfig;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_FILTER: &str = "bizcred_tui=info";

/// Keeps the background log writer alive; buffered lines flush on drop
pub struct LoggingHandle {
    pub _guard: WorkerGuard,
    pub log_file_path: PathBuf,
}

/// Resolve the filter directive: `RUST_LOG`, then config, then the default
fn filter_directive(env: Option<String>, config: &AppConfig) -> String {
    env.or_else(|| config.log_level.clone())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn log_file_name() -> String {
    format!(
        "bizcred-tui-{}.log",
        chrono::Utc::now().format("%Y%m%dT%H%M%SZ")
    )
}

/// Install the global subscriber writing to a file under `logs_dir`
pub fn init_logging(config: &AppConfig, logs_dir: &Path) -> Result<LoggingHandle> {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), config);
    let filter = tracing_subscriber::EnvFilter::new(directive);

    std::fs::create_dir_all(logs_dir)?;
    let log_filename = log_file_name();
    let log_file_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(LoggingHandle {
        _guard: guard,
        log_file_path,
    })
}
