//! Global tracing subscriber setup.

use anyhow::{Context, Result};
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::domain::models::LoggingConfig;

const LOG_FILE_NAME: &str = "geoipdb.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Stdout rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human readable output.
    Pretty,
}

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    /// New file every day.
    Daily,
    /// New file every hour.
    Hourly,
    /// A single file.
    Never,
}

/// Keeps the non-blocking file writer alive. Dropping it flushes pending
/// log lines, so hold it for the lifetime of the process.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggerGuard {
    file_guard: Option<WorkerGuard>,
}

impl LoggerGuard {
    /// Whether a file layer was installed.
    pub const fn writes_to_file(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Install the global tracing subscriber described by `config`.
///
/// `RUST_LOG` directives take precedence over `config.level`. Fails if the
/// config is invalid or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggerGuard> {
    let level = parse_log_level(&config.level)?;
    let format = parse_log_format(&config.format)?;
    let rotation = parse_rotation(&config.rotation)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer(format, env_filter.clone())];

    let guard = match config.log_dir {
        Some(ref log_dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(log_dir, rotation));
            // Files are always JSON so they stay machine readable
            let file_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_current_span(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter)
                .boxed();
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    tracing::info!(
        level = %config.level,
        format = ?format,
        file_output = config.log_dir.is_some(),
        "logger initialized"
    );

    Ok(LoggerGuard { file_guard: guard })
}

fn stdout_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stdout)
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(io::stdout)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_appender(log_dir: &std::path::Path, rotation: RotationPolicy) -> RollingFileAppender {
    match rotation {
        RotationPolicy::Daily => rolling::daily(log_dir, LOG_FILE_NAME),
        RotationPolicy::Hourly => rolling::hourly(log_dir, LOG_FILE_NAME),
        RotationPolicy::Never => rolling::never(log_dir, LOG_FILE_NAME),
    }
}

/// Parse log level string to Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}

fn parse_log_format(format: &str) -> Result<LogFormat> {
    match format {
        "json" => Ok(LogFormat::Json),
        "pretty" => Ok(LogFormat::Pretty),
        _ => anyhow::bail!("Invalid log format: {format}"),
    }
}

fn parse_rotation(rotation: &str) -> Result<RotationPolicy> {
    match rotation {
        "daily" => Ok(RotationPolicy::Daily),
        "hourly" => Ok(RotationPolicy::Hourly),
        "never" => Ok(RotationPolicy::Never),
        _ => anyhow::bail!("Invalid log rotation: {rotation}"),
    }
}
