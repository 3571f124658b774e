//! Suppression strategies
//!
//! Two flavors: [`SuppressStrategy`] removes the span entirely (the in-core
//! built-in behind `StrategyKind::Suppress`), while [`MaskStrategy`]
//! replaces it with a fill character, preserving or fixing the length.

use super::Strategy;
use crate::errors::StrategyError;
use crate::models::Document;

/// Suppression strategy - replaces spans with the empty string
pub struct SuppressStrategy;

impl SuppressStrategy {
    /// Create a new suppression strategy
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for SuppressStrategy {
    fn apply(
        &self,
        _original: &str,
        _label: &str,
        _document: &Document,
    ) -> Result<String, StrategyError> {
        Ok(String::new())
    }
}

impl Default for SuppressStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// Masking strategy - replaces spans with a run of a fill character
///
/// By default the output has the same code point length as the input, so
/// "foobar" becomes "XXXXXX". A fixed custom length can be configured
/// instead.
pub struct MaskStrategy {
    fill: char,
    custom_length: Option<usize>,
}

impl MaskStrategy {
    /// Create a masking strategy with the default fill character 'X'
    pub fn new() -> Self {
        Self {
            fill: 'X',
            custom_length: None,
        }
    }

    /// Set the fill character
    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }

    /// Use a fixed output length independent of the input
    pub fn with_length(mut self, length: usize) -> Self {
        self.custom_length = Some(length);
        self
    }
}

impl Strategy for MaskStrategy {
    fn apply(
        &self,
        original: &str,
        _label: &str,
        _document: &Document,
    ) -> Result<String, StrategyError> {
        let length = self
            .custom_length
            .unwrap_or_else(|| original.chars().count());
        Ok(self.fill.to_string().repeat(length))
    }
}

impl Default for MaskStrategy {
    fn default() -> Self {
        Self::new()
    }
}
