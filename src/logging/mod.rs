//! Structured logging setup using tracing
//!
//! # Example
//!
//! ```no_run
//! use scrub::logging::init_logging;
//!
//! init_logging("info").expect("Failed to initialize logging");
//! ```

use crate::errors::{Result, ScrubError};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialize console logging for the library
///
/// Builds an env-filtered subscriber defaulting to `scrub=<level>`;
/// the `RUST_LOG` environment variable takes precedence when set.
pub fn init_logging(log_level_str: &str) -> Result<()> {
    let log_level = parse_log_level(log_level_str)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scrub={log_level}")));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| ScrubError::Configuration(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

/// Parse a log level string
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(ScrubError::Configuration(format!(
            "Invalid log level: {level}"
        ))),
    }
}
