//! Main anonymization engine
//!
//! This module provides the core [`AnonymizationEngine`] that sequences
//! detection, conflict resolution, strategy dispatch and rewriting for one
//! document.
//!
//! # Architecture
//!
//! The engine coordinates four components:
//! - **Detectors**: produce candidate spans over the immutable document
//! - **Conflict Resolver**: selects a non-overlapping ordered subset
//! - **Strategy Dispatcher**: attaches a replacement to each survivor
//! - **Text Rewriter**: applies the replacements in one pass, producing
//!   the output text and the audit mapping
//!
//! # Examples
//!
//! ```no_run
//! use scrub::config::AnonymizationConfig;
//! use scrub::engine::AnonymizationEngine;
//!
//! # async fn example() -> scrub::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let result = engine
//!     .anonymize("Reach me at jane.doe@example.com")
//!     .await?;
//! println!("{}", result.output_text);
//! # Ok(())
//! # }
//! ```

use crate::audit::AuditLogger;
use crate::config::{AnonymizationConfig, InvalidSpanPolicy};
use crate::detector::{patterns::PatternRegistry, Detector, RegexDetector};
use crate::errors::Result;
use crate::models::{AnonymizationResult, Document, ResolvedSpan, Span, StrategyKind};
use crate::report::DryRunReport;
use crate::resolver::ConflictResolver;
use crate::rewriter;
use crate::strategy::{Strategy, StrategyDispatcher};
use std::sync::Arc;
use std::time::Instant;

/// Main anonymization engine
///
/// # Thread Safety
///
/// The engine is `Send + Sync` and can be shared across async tasks with
/// `Arc`. Documents are independent units of work: no state is shared
/// between concurrent `anonymize` calls, so callers may process many
/// documents in parallel. Within one call, detectors run concurrently
/// against the same immutable document.
///
/// # Cancellation
///
/// Dropping the future returned by [`anonymize`](Self::anonymize) abandons
/// any in-flight detector calls; no partial output is ever observable.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    detectors: Vec<Arc<dyn Detector>>,
    resolver: ConflictResolver,
    dispatcher: StrategyDispatcher,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create a new engine from configuration
    ///
    /// Installs the built-in regex detector (with the configured pattern
    /// library, or the embedded defaults) and the in-core redact/suppress
    /// strategies. Further detectors and strategies are attached with
    /// [`with_detector`](Self::with_detector) and
    /// [`register_strategy`](Self::register_strategy).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails or the pattern
    /// library cannot be loaded.
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config.validate()?;

        let detector: Arc<dyn Detector> = if let Some(ref pattern_path) = config.pattern_library {
            let registry = PatternRegistry::from_file(pattern_path)?;
            Arc::new(RegexDetector::with_registry(registry))
        } else {
            Arc::new(RegexDetector::new()?)
        };

        let dispatcher =
            StrategyDispatcher::new(config.strategies.clone(), config.default_strategy);
        let resolver = ConflictResolver::new(config.resolution.clone());

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            detectors: vec![detector],
            resolver,
            dispatcher,
            audit_logger,
        })
    }

    /// Append a detector
    pub fn with_detector(mut self, detector: Arc<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Replace the detector set
    pub fn with_detectors(mut self, detectors: Vec<Arc<dyn Detector>>) -> Self {
        self.detectors = detectors;
        self
    }

    /// Register a strategy implementation for a kind
    ///
    /// Required before any label maps to `Generalize` or `Pseudonymize`;
    /// dispatch fails otherwise rather than passing sensitive text through.
    pub fn register_strategy(mut self, kind: StrategyKind, strategy: Arc<dyn Strategy>) -> Self {
        self.dispatcher.register(kind, strategy);
        self
    }

    /// Whether the engine is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Anonymize a single document
    ///
    /// All-or-nothing at document granularity: a failing detector or
    /// strategy aborts the whole document and no partial output is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`crate::errors::ScrubError::Detector`] when a detector fails
    /// - [`crate::errors::ScrubError::InvalidSpan`] for malformed detector
    ///   output under the abort policy (under the drop policy the
    ///   contribution is discarded with a warning instead)
    /// - [`crate::errors::ScrubError::Strategy`] when a strategy fails
    /// - [`crate::errors::ScrubError::Consistency`] when resolver output
    ///   reaches the rewriter overlapping (internal bug)
    pub async fn anonymize(&self, text: &str) -> Result<AnonymizationResult> {
        let start = Instant::now();
        let document = Document::new(text);

        let candidates = self.collect_candidates(&document).await?;

        tracing::debug!(
            document = %document.id(),
            candidates = candidates.len(),
            "Collected candidate spans"
        );

        let surviving = self.resolver.resolve(&document, candidates)?;

        if self.config.dry_run {
            let resolved = surviving
                .into_iter()
                .map(|span| {
                    let kind = self.dispatcher.kind_for(span.label());
                    ResolvedSpan::new(span, kind)
                })
                .collect();
            let processing_time = start.elapsed().as_millis() as u64;
            // Dry-run returns the original text untouched
            return Ok(AnonymizationResult::new(
                document.id(),
                document.text().to_string(),
                resolved,
                Vec::new(),
                processing_time,
            ));
        }

        let completed = self.dispatcher.complete(&document, surviving)?;
        let output = rewriter::rewrite(&document, &completed)?;

        let processing_time = start.elapsed().as_millis() as u64;
        let result = AnonymizationResult::new(
            document.id(),
            output.text,
            completed,
            output.audit,
            processing_time,
        );

        if let Some(ref logger) = self.audit_logger {
            logger.log(&document, &result)?;
        }

        Ok(result)
    }

    /// Anonymize a batch of documents
    ///
    /// Fail-safe per document: a failing document is logged and skipped,
    /// never emitted half-anonymized.
    pub async fn anonymize_batch(&self, texts: Vec<String>) -> Result<Vec<AnonymizationResult>> {
        let mut results = Vec::with_capacity(texts.len());

        for text in texts {
            match self.anonymize(&text).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to anonymize document");
                    continue;
                }
            }
        }

        Ok(results)
    }

    /// Anonymize a batch and aggregate a report
    pub async fn anonymize_batch_with_report(
        &self,
        texts: Vec<String>,
    ) -> Result<(Vec<AnonymizationResult>, DryRunReport)> {
        let mut results = Vec::with_capacity(texts.len());
        let mut report = DryRunReport::new();

        for text in texts {
            match self.anonymize(&text).await {
                Ok(result) => {
                    report.add_document(&result);
                    results.push(result);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to anonymize document");
                    report.add_warning(format!("Failed to anonymize document: {e}"));
                    continue;
                }
            }
        }

        Ok((results, report))
    }

    /// Run all detectors concurrently and merge their contributions
    async fn collect_candidates(&self, document: &Document) -> Result<Vec<Span>> {
        let detections = futures::future::join_all(self.detectors.iter().map(|detector| {
            let detector = Arc::clone(detector);
            async move {
                let spans = detector.detect(document).await;
                (detector.id().to_string(), spans)
            }
        }))
        .await;

        let mut candidates = Vec::new();
        for (detector_id, outcome) in detections {
            // A failing detector always aborts the document
            let spans = outcome?;

            match self.validate_contribution(document, &spans) {
                Ok(()) => candidates.extend(spans),
                Err(e) => match self.config.invalid_span_policy {
                    InvalidSpanPolicy::DropDetector => {
                        tracing::warn!(
                            document = %document.id(),
                            detector = detector_id.as_str(),
                            error = %e,
                            "Dropping detector contribution with malformed spans"
                        );
                    }
                    InvalidSpanPolicy::AbortDocument => return Err(e.into()),
                },
            }
        }

        Ok(candidates)
    }

    fn validate_contribution(
        &self,
        document: &Document,
        spans: &[Span],
    ) -> std::result::Result<(), crate::errors::InvalidSpanError> {
        for span in spans {
            span.validate_bounds(document)?;
        }
        Ok(())
    }
}
