//! Redaction strategy

use super::Strategy;
use crate::errors::StrategyError;
use crate::models::Document;

/// Redaction strategy - replaces spans with `[LABEL]` placeholder tokens
pub struct RedactStrategy;

impl RedactStrategy {
    /// Create a new redaction strategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for RedactStrategy {
    fn apply(
        &self,
        _original: &str,
        label: &str,
        _document: &Document,
    ) -> Result<String, StrategyError> {
        Ok(format!("[{label}]"))
    }
}

impl Default for RedactStrategy {
    fn default() -> Self {
        Self::new()
    }
}
