//! Anonymization results and the audit mapping

use crate::models::{ResolvedSpan, StrategyKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One entry of the audit mapping
///
/// Correlates a resolved span in the original text with its replacement in
/// the output text. Output offsets account for cumulative length drift and
/// index into the output string. Used for downstream re-identification
/// control, never for reversing anonymization automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Label of the replaced span
    pub label: String,
    /// Strategy that produced the replacement
    pub strategy: StrategyKind,
    /// Start of the original span (code points, input text)
    pub original_start: usize,
    /// End of the original span (code points, input text)
    pub original_end: usize,
    /// Start of the replacement (code points, output text)
    pub output_start: usize,
    /// End of the replacement (code points, output text)
    pub output_end: usize,
    /// The replacement string as written into the output
    pub replacement: String,
}

/// Outcome of anonymizing one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationResult {
    /// Identifier of the processed document
    pub document_id: Uuid,
    /// Anonymized output text (the original text in dry-run mode)
    pub output_text: String,
    /// Spans that survived conflict resolution, ascending by start offset
    pub resolved: Vec<ResolvedSpan>,
    /// Audit mapping, one entry per rewritten span (empty in dry-run mode)
    pub audit: Vec<AuditEntry>,
    /// Detection counts by label
    pub stats_by_label: HashMap<String, usize>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of the anonymization
    pub timestamp: DateTime<Utc>,
}

impl AnonymizationResult {
    /// Create a new result, deriving per-label statistics from the spans
    pub fn new(
        document_id: Uuid,
        output_text: String,
        resolved: Vec<ResolvedSpan>,
        audit: Vec<AuditEntry>,
        processing_time_ms: u64,
    ) -> Self {
        let mut stats_by_label = HashMap::new();
        for span in &resolved {
            *stats_by_label
                .entry(span.span.label().to_string())
                .or_insert(0) += 1;
        }

        Self {
            document_id,
            output_text,
            resolved,
            audit,
            stats_by_label,
            processing_time_ms,
            timestamp: Utc::now(),
        }
    }

    /// Total number of resolved detections
    pub fn total_detections(&self) -> usize {
        self.resolved.len()
    }

    /// Whether any sensitive span was found
    pub fn has_detections(&self) -> bool {
        !self.resolved.is_empty()
    }
}
