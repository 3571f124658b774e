//! Single-pass text rewriting
//!
//! Consumes the ordered, completed resolved-span sequence and produces the
//! anonymized string plus the audit mapping. Untouched text between spans
//! is copied verbatim; each span's region is substituted with its
//! replacement. All slicing happens on code point boundaries through the
//! document's offset table, so a multi-byte scalar value can never be
//! split.
//!
//! The ascending/non-overlapping/completed contract is asserted here: a
//! violation means the resolver or dispatcher is buggy and the rewrite
//! fails fatally with [`ConsistencyViolationError`], never a best-effort
//! output.

use crate::errors::ConsistencyViolationError;
use crate::models::{AuditEntry, Document, ResolvedSpan};

/// Anonymized text plus the audit mapping
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOutput {
    /// The anonymized output string
    pub text: String,
    /// One entry per rewritten span, ordered by original start offset
    pub audit: Vec<AuditEntry>,
}

/// Apply completed resolved spans to the document in one linear pass
pub fn rewrite(
    document: &Document,
    resolved: &[ResolvedSpan],
) -> Result<RewriteOutput, ConsistencyViolationError> {
    let mut text = String::with_capacity(document.text().len());
    let mut audit = Vec::with_capacity(resolved.len());

    // Char offset up to which the input has been consumed; doubles as the
    // previous span's end for the ordering check.
    let mut cursor = 0usize;
    // Char offset of the write position in the output, tracking cumulative
    // drift between original and replacement lengths.
    let mut out_chars = 0usize;

    for entry in resolved {
        let span = &entry.span;
        if span.end() > document.char_len() {
            return Err(ConsistencyViolationError::new(format!(
                "span [{}, {}) exceeds document length {} (document {})",
                span.start(),
                span.end(),
                document.char_len(),
                document.id()
            )));
        }
        if span.start() < cursor {
            return Err(ConsistencyViolationError::new(format!(
                "span [{}, {}) overlaps or precedes the span ending at {} (document {})",
                span.start(),
                span.end(),
                cursor,
                document.id()
            )));
        }
        let replacement = entry.replacement.as_deref().ok_or_else(|| {
            ConsistencyViolationError::new(format!(
                "span [{}, {}) reached the rewriter without a replacement (document {})",
                span.start(),
                span.end(),
                document.id()
            ))
        })?;

        text.push_str(document.slice(cursor, span.start()));
        out_chars += span.start() - cursor;

        let replacement_chars = replacement.chars().count();
        text.push_str(replacement);
        audit.push(AuditEntry {
            label: span.label().to_string(),
            strategy: entry.strategy,
            original_start: span.start(),
            original_end: span.end(),
            output_start: out_chars,
            output_end: out_chars + replacement_chars,
            replacement: replacement.to_string(),
        });

        out_chars += replacement_chars;
        cursor = span.end();
    }

    text.push_str(document.slice(cursor, document.char_len()));

    Ok(RewriteOutput { text, audit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Span, StrategyKind};

    fn completed(
        start: usize,
        end: usize,
        label: &str,
        replacement: &str,
    ) -> ResolvedSpan {
        ResolvedSpan::new(
            Span::new(start, end, label, 0.9, "test").unwrap(),
            StrategyKind::Redact,
        )
        .completed(replacement)
    }

    #[test]
    fn test_basic_substitution() {
        let document = Document::new("Alice met Bob on 2023-01-05.");
        let spans = vec![
            completed(0, 5, "PERSON", "[PERSON]"),
            completed(10, 13, "PERSON", "[PERSON]"),
            completed(17, 27, "DATE", "[DATE]"),
        ];
        let output = rewrite(&document, &spans).unwrap();
        assert_eq!(output.text, "[PERSON] met [PERSON] on [DATE].");
    }

    #[test]
    fn test_no_spans_copies_verbatim() {
        let document = Document::new("nothing sensitive here");
        let output = rewrite(&document, &[]).unwrap();
        assert_eq!(output.text, document.text());
        assert!(output.audit.is_empty());
    }

    #[test]
    fn test_output_length_arithmetic() {
        // len(out) == len(text) - sum(span lengths) + sum(replacement lengths)
        let document = Document::new("abcdefghij");
        let spans = vec![
            completed(1, 3, "A", "xxxx"),
            completed(5, 9, "B", "y"),
        ];
        let output = rewrite(&document, &spans).unwrap();
        let expected = 10 - (2 + 4) + (4 + 1);
        assert_eq!(output.text.chars().count(), expected);
        assert_eq!(output.text, "axxxxdeyj");
    }

    #[test]
    fn test_audit_offsets_locate_replacements() {
        let document = Document::new("Alice met Bob on 2023-01-05.");
        let spans = vec![
            completed(0, 5, "PERSON", "[PERSON]"),
            completed(10, 13, "PERSON", "[PERSON]"),
            completed(17, 27, "DATE", "[DATE]"),
        ];
        let output = rewrite(&document, &spans).unwrap();
        let out_chars: Vec<char> = output.text.chars().collect();
        for entry in &output.audit {
            let located: String = out_chars[entry.output_start..entry.output_end]
                .iter()
                .collect();
            assert_eq!(located, entry.replacement);
        }
    }

    #[test]
    fn test_multibyte_text_rewrites_on_code_points() {
        // "Müller" (6 chars) followed by CJK and an emoji
        let document = Document::new("Müller wohnt in 東京 🏠");
        let spans = vec![
            completed(0, 6, "PERSON", "[PERSON]"),
            completed(16, 18, "LOCATION", "[LOC]"),
        ];
        let output = rewrite(&document, &spans).unwrap();
        assert_eq!(output.text, "[PERSON] wohnt in [LOC] 🏠");

        let out_chars: Vec<char> = output.text.chars().collect();
        for entry in &output.audit {
            let located: String = out_chars[entry.output_start..entry.output_end]
                .iter()
                .collect();
            assert_eq!(located, entry.replacement);
        }
    }

    #[test]
    fn test_replacement_spanning_whole_document() {
        let document = Document::new("secret");
        let spans = vec![completed(0, 6, "ALL", "")];
        let output = rewrite(&document, &spans).unwrap();
        assert_eq!(output.text, "");
        assert_eq!(output.audit[0].output_start, 0);
        assert_eq!(output.audit[0].output_end, 0);
    }

    #[test]
    fn test_overlapping_spans_fail_fatally() {
        let document = Document::new("abcdefghij");
        let spans = vec![
            completed(0, 5, "A", "x"),
            completed(3, 8, "B", "y"),
        ];
        let err = rewrite(&document, &spans).unwrap_err();
        assert!(err.detail.contains("overlaps or precedes"));
    }

    #[test]
    fn test_unordered_spans_fail_fatally() {
        let document = Document::new("abcdefghij");
        let spans = vec![
            completed(5, 7, "A", "x"),
            completed(0, 2, "B", "y"),
        ];
        assert!(rewrite(&document, &spans).is_err());
    }

    #[test]
    fn test_out_of_bounds_span_fails_fatally() {
        let document = Document::new("abc");
        let spans = vec![completed(0, 9, "A", "x")];
        let err = rewrite(&document, &spans).unwrap_err();
        assert!(err.detail.contains("exceeds document length"));
    }

    #[test]
    fn test_incomplete_span_fails_fatally() {
        let document = Document::new("abcdef");
        let spans = vec![ResolvedSpan::new(
            Span::new(0, 3, "A", 0.9, "test").unwrap(),
            StrategyKind::Redact,
        )];
        let err = rewrite(&document, &spans).unwrap_err();
        assert!(err.detail.contains("without a replacement"));
    }
}
