//! # crashinfo utilities
//!
//! Shared utilities, logging, and helpers for crashinfo.
//!
//! This crate provides common functionality used across the workspace,
//! including logging infrastructure built on `tracing`.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, log_format_from_env, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
