//! Error types for the anonymization pipeline
//!
//! All errors are domain-specific and don't expose third-party types.
//! The taxonomy distinguishes malformed detector output ([`InvalidSpanError`],
//! policy-routed), collaborator failures ([`DetectorError`], [`StrategyError`],
//! document-fatal) and internal contract breaches ([`ConsistencyViolationError`],
//! always fatal).

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Main error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed detector output (zero-length or out-of-bounds span)
    #[error(transparent)]
    InvalidSpan(#[from] InvalidSpanError),

    /// Detector collaborator failure
    #[error(transparent)]
    Detector(#[from] DetectorError),

    /// Strategy collaborator failure
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// Resolved spans violated the non-overlap contract downstream
    #[error(transparent)]
    Consistency(#[from] ConsistencyViolationError),

    /// Audit logging errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Malformed span reported by a detector
///
/// Local and non-retryable. Depending on the configured policy the engine
/// either drops the offending detector's contribution with a warning or
/// aborts the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSpanError {
    /// Inclusive start offset as reported
    pub start: usize,
    /// Exclusive end offset as reported
    pub end: usize,
    /// Detector that produced the span
    pub source: String,
    /// What made the span invalid
    pub reason: String,
}

// `Display`/`Error` are implemented by hand rather than via `#[derive(Error)]`:
// the field is named `source`, which thiserror reserves for the error's
// `source()` (requiring the field to itself be an `Error`). Here `source` is
// the detector name, so the derive cannot apply. The rendered message matches
// the original `#[error(...)]` format string exactly.
impl std::fmt::Display for InvalidSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid span [{}, {}) from detector '{}': {}",
            self.start, self.end, self.source, self.reason
        )
    }
}

impl std::error::Error for InvalidSpanError {}

/// Failure of a detector collaborator
///
/// Propagated to the orchestrator, which aborts the document. No partial
/// output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Detector '{detector_id}' failed: {cause}")]
pub struct DetectorError {
    /// Identifier of the failing detector
    pub detector_id: String,
    /// Underlying cause, rendered as text
    pub cause: String,
}

impl DetectorError {
    /// Create a new detector error
    pub fn new(detector_id: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            detector_id: detector_id.into(),
            cause: cause.into(),
        }
    }
}

/// Failure of a strategy collaborator
///
/// A failed strategy aborts the document. Raw sensitive text is never left
/// in place silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Strategy for label '{label}' failed: {cause}")]
pub struct StrategyError {
    /// Label of the span the strategy was applied to
    pub label: String,
    /// Underlying cause, rendered as text
    pub cause: String,
}

impl StrategyError {
    /// Create a new strategy error
    pub fn new(label: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            cause: cause.into(),
        }
    }
}

/// Resolved spans found overlapping, unordered or incomplete at rewrite time
///
/// Indicates a bug in the conflict resolver or the dispatcher, never a
/// caller mistake. Always fatal, never recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Resolved span consistency violation: {detail}")]
pub struct ConsistencyViolationError {
    /// Description of the violated contract
    pub detail: String,
}

impl ConsistencyViolationError {
    /// Create a new consistency violation error
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        ScrubError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Configuration(format!("TOML parse error: {err}"))
    }
}
