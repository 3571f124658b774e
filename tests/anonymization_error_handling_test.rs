//! Error handling tests for the anonymization pipeline

use async_trait::async_trait;
use scrub::config::{AnonymizationConfig, InvalidSpanPolicy};
use scrub::detector::Detector;
use scrub::engine::AnonymizationEngine;
use scrub::errors::{DetectorError, ScrubError, StrategyError};
use scrub::models::{Document, Span, StrategyKind};
use scrub::strategy::Strategy;
use std::collections::HashMap;
use std::sync::Arc;

struct StubDetector {
    id: String,
    spans: Vec<(usize, usize, &'static str, f32)>,
}

impl StubDetector {
    fn new(id: &str, spans: Vec<(usize, usize, &'static str, f32)>) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            spans,
        })
    }
}

#[async_trait]
impl Detector for StubDetector {
    fn id(&self) -> &str {
        &self.id
    }

    async fn detect(&self, _document: &Document) -> Result<Vec<Span>, DetectorError> {
        self.spans
            .iter()
            .map(|(start, end, label, confidence)| {
                Span::new(*start, *end, *label, *confidence, self.id.clone())
                    .map_err(|e| DetectorError::new(self.id.clone(), e.to_string()))
            })
            .collect()
    }
}

struct FailingDetector;

#[async_trait]
impl Detector for FailingDetector {
    fn id(&self) -> &str {
        "failing"
    }

    async fn detect(&self, _document: &Document) -> Result<Vec<Span>, DetectorError> {
        Err(DetectorError::new("failing", "model endpoint timed out"))
    }
}

struct FailingStrategy;

impl Strategy for FailingStrategy {
    fn apply(
        &self,
        _original: &str,
        label: &str,
        _document: &Document,
    ) -> Result<String, StrategyError> {
        Err(StrategyError::new(label, "replacement pool exhausted"))
    }
}

#[test]
fn test_zero_length_span_is_invalid() {
    let err = Span::new(5, 5, "PERSON", 0.9, "stub").unwrap_err();
    assert!(err.reason.contains("zero or negative length"));
}

#[tokio::test]
async fn test_detector_failure_aborts_document() {
    let engine = AnonymizationEngine::new(AnonymizationConfig::default())
        .unwrap()
        .with_detectors(vec![
            Arc::new(FailingDetector),
            StubDetector::new("good", vec![(0, 5, "PERSON", 0.9)]),
        ]);

    let err = engine.anonymize("Alice is here").await.unwrap_err();
    match err {
        ScrubError::Detector(e) => {
            assert_eq!(e.detector_id, "failing");
            assert!(e.cause.contains("timed out"));
        }
        other => panic!("expected detector error, got {other}"),
    }
}

#[tokio::test]
async fn test_drop_detector_policy_keeps_other_contributions() {
    // One detector reports a span past the end of the document. Under the
    // drop policy its whole contribution is discarded and the document
    // still completes from the remaining detector.
    let config = AnonymizationConfig {
        invalid_span_policy: InvalidSpanPolicy::DropDetector,
        ..Default::default()
    };
    let engine = AnonymizationEngine::new(config)
        .unwrap()
        .with_detectors(vec![
            StubDetector::new("broken", vec![(0, 4, "DATE", 0.99), (0, 1000, "DATE", 0.99)]),
            StubDetector::new("good", vec![(0, 5, "PERSON", 0.9)]),
        ]);

    let result = engine.anonymize("Alice is here").await.unwrap();

    assert_eq!(result.total_detections(), 1);
    assert_eq!(result.output_text, "[PERSON] is here");
}

#[tokio::test]
async fn test_abort_document_policy_propagates_invalid_span() {
    let config = AnonymizationConfig {
        invalid_span_policy: InvalidSpanPolicy::AbortDocument,
        ..Default::default()
    };
    let engine = AnonymizationEngine::new(config)
        .unwrap()
        .with_detectors(vec![
            StubDetector::new("broken", vec![(0, 1000, "DATE", 0.99)]),
            StubDetector::new("good", vec![(0, 5, "PERSON", 0.9)]),
        ]);

    let err = engine.anonymize("Alice is here").await.unwrap_err();
    match err {
        ScrubError::InvalidSpan(e) => {
            assert_eq!(e.end, 1000);
            assert_eq!(e.source, "broken");
        }
        other => panic!("expected invalid span error, got {other}"),
    }
}

#[tokio::test]
async fn test_strategy_failure_aborts_document() {
    // A failing strategy must abort rather than leave raw text in place
    let config = AnonymizationConfig {
        strategies: HashMap::from([("PERSON".to_string(), StrategyKind::Generalize)]),
        ..Default::default()
    };
    let engine = AnonymizationEngine::new(config)
        .unwrap()
        .with_detectors(vec![StubDetector::new("stub", vec![(0, 5, "PERSON", 0.9)])])
        .register_strategy(StrategyKind::Generalize, Arc::new(FailingStrategy));

    let err = engine.anonymize("Alice is here").await.unwrap_err();
    match err {
        ScrubError::Strategy(e) => {
            assert_eq!(e.label, "PERSON");
            assert!(e.cause.contains("exhausted"));
        }
        other => panic!("expected strategy error, got {other}"),
    }
}

#[tokio::test]
async fn test_unregistered_strategy_kind_fails() {
    let config = AnonymizationConfig {
        strategies: HashMap::from([("PERSON".to_string(), StrategyKind::Pseudonymize)]),
        ..Default::default()
    };
    let engine = AnonymizationEngine::new(config)
        .unwrap()
        .with_detectors(vec![StubDetector::new("stub", vec![(0, 5, "PERSON", 0.9)])]);

    let err = engine.anonymize("Alice is here").await.unwrap_err();
    assert!(matches!(err, ScrubError::Strategy(_)));
    assert!(err.to_string().contains("no implementation registered"));
}

#[tokio::test]
async fn test_batch_never_returns_failed_documents() {
    let config = AnonymizationConfig {
        invalid_span_policy: InvalidSpanPolicy::AbortDocument,
        ..Default::default()
    };
    // Spans fit the longer documents but overflow the short one
    let engine = AnonymizationEngine::new(config)
        .unwrap()
        .with_detectors(vec![StubDetector::new("stub", vec![(0, 12, "PERSON", 0.9)])]);

    let results = engine
        .anonymize_batch(vec![
            "long enough text".to_string(),
            "short".to_string(),
            "another long text".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(result.output_text[..8].to_string(), "[PERSON]");
    }
}

#[test]
fn test_invalid_pattern_library_path() {
    let config = AnonymizationConfig {
        pattern_library: Some("/nonexistent/path/patterns.toml".into()),
        ..Default::default()
    };
    let result = AnonymizationEngine::new(config);
    assert!(result.is_err(), "Should fail with invalid pattern library path");
}
