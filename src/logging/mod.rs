//! Console plus size-rotated file tracing output.

use anyhow::{Context, Result};
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use std::backtrace::Backtrace;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Keeps the non-blocking file writer alive; hold it until shutdown
pub struct LogGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber: stdout plus a size-rotated log file.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<LogGuard> {
    let writer = file_writer(config)
        .with_context(|| format!("open log file: {}", config.file.display()))?;
    let (file_writer, file_guard) = tracing_appender::non_blocking(writer);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(env_filter(&config.level));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(env_filter(&config.level));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;

    install_panic_hook();

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// `api.log` rolls over to `api.log.1`, `api.log.2`, ... once it reaches
/// `max_bytes`; only `backup_count` backups are kept. With no backups the
/// file grows without rotating.
fn file_writer(config: &LoggingConfig) -> std::io::Result<FileRotate<AppendCount>> {
    if let Some(parent) = config.file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let limit = if config.backup_count == 0 {
        ContentLimit::None
    } else {
        ContentLimit::Bytes(config.max_bytes as usize)
    };

    Ok(FileRotate::new(
        &config.file,
        AppendCount::new(config.backup_count),
        limit,
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Route panics through tracing so they reach the log file with a backtrace
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        tracing::error!(panic = %info, backtrace = %backtrace, "panic");
    }));
}
