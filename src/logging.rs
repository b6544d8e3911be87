//! Structured logging for the nowcast service.
//!
//! Events go through `tracing` with region and window context. The
//! subscriber always writes to stderr: in stdio mode stdout carries the
//! protocol stream and must stay clean.

use std::fmt;
use std::io::IsTerminal;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::model::{AttemptRecord, QueryWindow, UpstreamError};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

/// Why one attempt did not produce data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// The hour is not published yet. Normal in the first minutes past the hour.
    Expected,
    /// The upstream answered with an error status or a body we cannot read.
    Unexpected,
    /// Network trouble; may or may not be on our side.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classifies an upstream transport failure.
pub fn classify_upstream_failure(err: &UpstreamError) -> FailureType {
    match err {
        UpstreamError::HttpStatus(_) | UpstreamError::Decode(_) => FailureType::Unexpected,
        UpstreamError::Network(_) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Installs the global subscriber. `RUST_LOG` overrides `min_level`.
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logging(min_level: LogLevel) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(min_level.directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Structured Attempt Logging
// ---------------------------------------------------------------------------

/// Logs a transport failure for one window with its classification.
pub fn log_upstream_failure(region: &str, window: &QueryWindow, err: &UpstreamError) {
    // Transport errors are never Expected; empty windows go through log_empty_window.
    let failure_type = classify_upstream_failure(err);
    if failure_type == FailureType::Unexpected {
        error!(region, window = %window, kind = %failure_type, "attempt failed: {}", err)
    } else {
        warn!(region, window = %window, kind = %failure_type, "attempt failed: {}", err)
    }
}

/// Logs a parsed response that carried no usable data.
pub fn log_empty_window(region: &str, window: &QueryWindow, result_code: &str, count: usize) {
    debug!(
        region,
        window = %window,
        kind = %FailureType::Expected,
        result_code,
        count,
        "window not published yet"
    );
}

// ---------------------------------------------------------------------------
// Fetch Summary Logging
// ---------------------------------------------------------------------------

/// Logs the outcome of one `get_now_weather` invocation.
pub fn log_fetch_summary(region: &str, attempts: &[AttemptRecord], accepted: Option<&QueryWindow>) {
    match accepted {
        Some(window) if attempts.len() <= 1 => {
            info!(region, window = %window, "nowcast fetched")
        }
        Some(window) => {
            info!(region, window = %window, attempts = attempts.len(), "nowcast fetched after fallback")
        }
        None => warn!(region, attempts = attempts.len(), "no usable window"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            classify_upstream_failure(&UpstreamError::HttpStatus(500)),
            FailureType::Unexpected
        );
        assert_eq!(
            classify_upstream_failure(&UpstreamError::Decode("xml".into())),
            FailureType::Unexpected
        );
        assert_eq!(
            classify_upstream_failure(&UpstreamError::Network("timed out".into())),
            FailureType::Unknown
        );
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(LogLevel::Warning);
        init_logging(LogLevel::Debug);
    }
}
