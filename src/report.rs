//! Dry-run reporting
//!
//! Aggregates detection statistics over a batch so operators can inspect
//! what would be anonymized before committing to a configuration. Samples
//! carry labels and offsets only, never original text.

use crate::models::{AnonymizationResult, StrategyKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

/// Dry-run report with detection statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DryRunReport {
    /// Total documents analyzed
    pub total_documents: usize,

    /// Total spans that survived conflict resolution
    pub total_detections: usize,

    /// Detections by label
    pub detections_by_label: HashMap<String, usize>,

    /// Sample detections (first few per document)
    pub samples: Vec<DetectionSample>,

    /// Warnings collected during the run
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// One sampled detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSample {
    /// Span label
    pub label: String,
    /// Strategy that would be applied
    pub strategy: StrategyKind,
    /// Detector confidence
    pub confidence: f32,
    /// Producing detector
    pub source: String,
    /// Start offset in the original text
    pub start: usize,
    /// End offset in the original text
    pub end: usize,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Documents with at least one detection
    pub documents_with_detections: usize,

    /// Documents without detections
    pub documents_without_detections: usize,
}

/// Samples kept per document
const SAMPLES_PER_DOCUMENT: usize = 3;

impl DryRunReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add results from one processed document
    pub fn add_document(&mut self, result: &AnonymizationResult) {
        self.total_documents += 1;
        self.stats.total_processing_time_ms += result.processing_time_ms;

        if result.resolved.is_empty() {
            self.stats.documents_without_detections += 1;
        } else {
            self.stats.documents_with_detections += 1;
            self.total_detections += result.resolved.len();

            for entry in &result.resolved {
                *self
                    .detections_by_label
                    .entry(entry.span.label().to_string())
                    .or_insert(0) += 1;
            }

            for entry in result.resolved.iter().take(SAMPLES_PER_DOCUMENT) {
                self.samples.push(DetectionSample {
                    label: entry.span.label().to_string(),
                    strategy: entry.strategy,
                    confidence: entry.span.confidence(),
                    source: entry.span.source().to_string(),
                    start: entry.span.start(),
                    end: entry.span.end(),
                });
            }
        }

        if self.total_documents > 0 {
            self.stats.avg_processing_time_ms =
                self.stats.total_processing_time_ms / self.total_documents as u64;
        }
    }

    /// Record a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Render a human-readable summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Documents analyzed: {}", self.total_documents);
        let _ = writeln!(out, "Detections: {}", self.total_detections);

        let mut by_label: Vec<_> = self.detections_by_label.iter().collect();
        by_label.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (label, count) in by_label {
            let _ = writeln!(out, "  {label}: {count}");
        }

        let _ = writeln!(
            out,
            "Average processing time: {}ms",
            self.stats.avg_processing_time_ms
        );
        for warning in &self.warnings {
            let _ = writeln!(out, "WARNING: {warning}");
        }
        out
    }
}
