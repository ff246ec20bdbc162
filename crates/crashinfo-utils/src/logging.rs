//! # Logging Utilities
//!
//! Logging infrastructure for crashinfo using `tracing`.
//!
//! Log lines always go to stderr so they never mix with a report printed on
//! stdout. An optional log file can be added on top.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crashinfo_utils::init_logging;
//!
//! // Initialize with default settings (reads from RUST_LOG env var)
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::warn!("Something looks off");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=crashinfo_core=trace`)
//! - `CRASHINFO_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `CRASHINFO_LOG_FILE`: Optional path to log file (if not set, logs only to stderr)

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::env;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "CRASHINFO_LOG_FORMAT";
/// Environment variable naming an optional log file.
pub const LOG_FILE_ENV: &str = "CRASHINFO_LOG_FILE";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default)
    Pretty,
    /// JSON format, one object per line
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter (default: `warn`)
/// - `CRASHINFO_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `CRASHINFO_LOG_FILE`: Optional path to log file
///
/// The returned guard flushes the log file when dropped; keep it alive for
/// the life of the program.
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - `CRASHINFO_LOG_FORMAT` holds an unknown format
/// - The log file directory cannot be created
pub fn init_logging() -> Result<Option<WorkerGuard>, LoggingError>
{
    init_logging_with_level(None, log_format_from_env()?)
}

/// Initialize logging with an explicit level and format
///
/// An explicit `level` takes precedence over `RUST_LOG`. `CRASHINFO_LOG_FILE`
/// is still honoured.
///
/// ## Example
///
/// ```rust,no_run
/// use crashinfo_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// let _guard = init_logging_with_level(Some(LogLevel::Debug), LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: Option<LogLevel>, format: LogFormat) -> Result<Option<WorkerGuard>, LoggingError>
{
    let explicit_level = level.map(Level::from);
    let log_file = env::var(LOG_FILE_ENV).ok().map(PathBuf::from);

    let mut layers: Vec<BoxedLayer> = vec![console_layer(format, build_filter(explicit_level))];

    let guard = match log_file {
        Some(path) => {
            let directory = log_directory(&path);
            std::fs::create_dir_all(directory)?;
            let file_appender = tracing_appender::rolling::never(directory, path.file_name().unwrap_or_default());
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            layers.push(file_layer(format, non_blocking, build_filter(explicit_level)));
            Some(guard)
        }
        None => None,
    };

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok(guard)
}

/// Read `CRASHINFO_LOG_FORMAT`, defaulting to pretty output when unset.
///
/// ## Errors
///
/// Returns [`LoggingError::InvalidFormat`] if the variable holds an unknown format.
pub fn log_format_from_env() -> Result<LogFormat, LoggingError>
{
    match env::var(LOG_FORMAT_ENV) {
        Ok(value) => LogFormat::from_str(&value).map_err(LoggingError::InvalidFormat),
        Err(_) => Ok(LogFormat::Pretty),
    }
}

/// Build the level filter
///
/// Priority:
/// 1. An explicit level (from the `--log-level` flag)
/// 2. `RUST_LOG`, which allows per-crate filters like `crashinfo_core=trace`
/// 3. WARN
fn build_filter(explicit_level: Option<Level>) -> EnvFilter
{
    if let Some(level) = explicit_level {
        EnvFilter::new(level.to_string())
    } else if let Ok(rust_log) = env::var("RUST_LOG") {
        EnvFilter::try_new(&rust_log).unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    } else {
        EnvFilter::new(Level::WARN.to_string())
    }
}

fn log_directory(path: &Path) -> &Path
{
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(format: LogFormat, writer: NonBlocking, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
