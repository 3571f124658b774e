//! Detected spans and their resolved form

use crate::errors::InvalidSpanError;
use crate::models::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One detected region of interest
///
/// Offsets are Unicode code point offsets into the document, half-open
/// (`start` inclusive, `end` exclusive). Immutable once created: the
/// constructor enforces `start < end` and clamps confidence into [0, 1],
/// so a `Span` value is always well-formed in itself. Bounds against a
/// concrete document are checked separately with [`Span::validate_bounds`],
/// since detectors construct spans before the engine sees the document
/// length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    start: usize,
    end: usize,
    label: String,
    confidence: f32,
    source: String,
}

impl Span {
    /// Create a new span
    ///
    /// Fails with [`InvalidSpanError`] if `start >= end`. Zero-length spans
    /// are detector errors, never insertion points. A non-finite confidence
    /// is treated as 0.0; finite values are clamped into [0, 1].
    pub fn new(
        start: usize,
        end: usize,
        label: impl Into<String>,
        confidence: f32,
        source: impl Into<String>,
    ) -> Result<Self, InvalidSpanError> {
        let source = source.into();
        if start >= end {
            return Err(InvalidSpanError {
                start,
                end,
                source,
                reason: "zero or negative length".to_string(),
            });
        }
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(Self {
            start,
            end,
            label: label.into(),
            confidence,
            source,
        })
    }

    /// Inclusive start offset in code points
    pub fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end offset in code points
    pub fn end(&self) -> usize {
        self.end
    }

    /// Label tag, e.g. "PERSON" or "DATE"
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Detector-defined confidence in [0, 1]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Identifier of the detector that produced this span
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Length in code points
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// A span can never be empty; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Half-open interval intersection
    ///
    /// Touching spans (`a.end == b.start`) do not overlap. Nested spans do.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check the span fits within the document
    pub fn validate_bounds(&self, document: &Document) -> Result<(), InvalidSpanError> {
        if self.end > document.char_len() {
            return Err(InvalidSpanError {
                start: self.start,
                end: self.end,
                source: self.source.clone(),
                reason: format!(
                    "span exceeds document length {} (document {})",
                    document.char_len(),
                    document.id()
                ),
            });
        }
        Ok(())
    }
}

/// Anonymization technique applied to a resolved span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Replace with a fixed `[LABEL]` placeholder
    Redact,
    /// Replace with a more general value (pluggable)
    Generalize,
    /// Replace with a consistent synthetic value (pluggable)
    Pseudonymize,
    /// Remove the span entirely
    Suppress,
    /// Keep the original text unchanged
    Passthrough,
}

impl Default for StrategyKind {
    fn default() -> Self {
        Self::Redact
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redact => write!(f, "redact"),
            Self::Generalize => write!(f, "generalize"),
            Self::Pseudonymize => write!(f, "pseudonymize"),
            Self::Suppress => write!(f, "suppress"),
            Self::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// A span that survived conflict resolution
///
/// Created with an assigned strategy kind, completed when the dispatcher
/// fills in `replacement`, then consumed read-only by the rewriter. Not
/// persisted beyond the audit mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    /// The surviving candidate span
    pub span: Span,
    /// Strategy assigned from the label table
    pub strategy: StrategyKind,
    /// Replacement text, present once the strategy has executed
    pub replacement: Option<String>,
}

impl ResolvedSpan {
    /// Create a resolved span that has not executed its strategy yet
    pub fn new(span: Span, strategy: StrategyKind) -> Self {
        Self {
            span,
            strategy,
            replacement: None,
        }
    }

    /// Attach the executed replacement
    pub fn completed(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, "PERSON", 0.9, "test").unwrap()
    }

    #[test]
    fn test_zero_length_span_rejected() {
        let err = Span::new(5, 5, "PERSON", 0.9, "regex").unwrap_err();
        assert_eq!(err.start, 5);
        assert_eq!(err.end, 5);
        assert_eq!(err.source, "regex");
    }

    #[test]
    fn test_inverted_span_rejected() {
        assert!(Span::new(7, 3, "PERSON", 0.9, "regex").is_err());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Span::new(0, 1, "X", 1.7, "t").unwrap().confidence(), 1.0);
        assert_eq!(Span::new(0, 1, "X", -0.5, "t").unwrap().confidence(), 0.0);
        assert_eq!(Span::new(0, 1, "X", f32::NAN, "t").unwrap().confidence(), 0.0);
    }

    #[test]
    fn test_overlap_partial() {
        assert!(span(0, 10).overlaps(&span(5, 15)));
        assert!(span(5, 15).overlaps(&span(0, 10)));
    }

    #[test]
    fn test_overlap_nested() {
        assert!(span(0, 10).overlaps(&span(3, 6)));
        assert!(span(3, 6).overlaps(&span(0, 10)));
    }

    #[test]
    fn test_touching_spans_do_not_overlap() {
        assert!(!span(0, 5).overlaps(&span(5, 10)));
        assert!(!span(5, 10).overlaps(&span(0, 5)));
    }

    #[test]
    fn test_disjoint_spans_do_not_overlap() {
        assert!(!span(0, 3).overlaps(&span(7, 9)));
    }

    #[test]
    fn test_bounds_validation() {
        let doc = Document::new("short");
        assert!(span(0, 5).validate_bounds(&doc).is_ok());
        assert!(span(0, 6).validate_bounds(&doc).is_err());
    }

    #[test]
    fn test_strategy_kind_serde_snake_case() {
        let json = serde_json::to_string(&StrategyKind::Pseudonymize).unwrap();
        assert_eq!(json, "\"pseudonymize\"");
        let kind: StrategyKind = serde_json::from_str("\"suppress\"").unwrap();
        assert_eq!(kind, StrategyKind::Suppress);
    }

    #[test]
    fn test_resolved_span_lifecycle() {
        let resolved = ResolvedSpan::new(span(0, 5), StrategyKind::Redact);
        assert!(resolved.replacement.is_none());
        let completed = resolved.completed("[PERSON]");
        assert_eq!(completed.replacement.as_deref(), Some("[PERSON]"));
    }
}
