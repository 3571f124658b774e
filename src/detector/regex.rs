//! Regex-based rule detector

use super::{patterns::PatternRegistry, Detector};
use crate::errors::DetectorError;
use crate::models::{Document, Span};
use async_trait::async_trait;
use std::sync::Arc;

/// Identifier under which spans from this detector are reported
pub const REGEX_DETECTOR_ID: &str = "regex";

/// Regex-based detector over a pattern library
///
/// The `regex` engine reports byte offsets; matches are normalized to code
/// point offsets before they leave the adapter, per the detector contract.
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
    confidence_threshold: f32,
}

impl RegexDetector {
    /// Create a new regex detector with the embedded default patterns
    pub fn new() -> Result<Self, crate::errors::ScrubError> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.7,
        })
    }

    /// Create a new regex detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.7,
        }
    }

    /// Set the confidence threshold below which patterns are skipped
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    fn detect_in_text(&self, document: &Document) -> Result<Vec<Span>, DetectorError> {
        let text = document.text();
        let mut spans = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if pattern.confidence < self.confidence_threshold {
                continue;
            }

            for matched in pattern.regex.find_iter(text) {
                if matched.range().is_empty() {
                    tracing::debug!(
                        label = pattern.label.as_str(),
                        offset = matched.start(),
                        "Skipping empty regex match"
                    );
                    continue;
                }

                let start = document.byte_to_char(matched.start()).ok_or_else(|| {
                    DetectorError::new(REGEX_DETECTOR_ID, "match start off char boundary")
                })?;
                let end = document.byte_to_char(matched.end()).ok_or_else(|| {
                    DetectorError::new(REGEX_DETECTOR_ID, "match end off char boundary")
                })?;

                let span = Span::new(
                    start,
                    end,
                    pattern.label.clone(),
                    pattern.confidence,
                    REGEX_DETECTOR_ID,
                )
                .map_err(|e| DetectorError::new(REGEX_DETECTOR_ID, e.to_string()))?;
                spans.push(span);
            }
        }

        Ok(spans)
    }
}

#[async_trait]
impl Detector for RegexDetector {
    fn id(&self) -> &str {
        REGEX_DETECTOR_ID
    }

    async fn detect(&self, document: &Document) -> Result<Vec<Span>, DetectorError> {
        self.detect_in_text(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn detect(text: &str) -> Vec<Span> {
        let document = Document::new(text);
        RegexDetector::new().unwrap().detect(&document).await.unwrap()
    }

    #[tokio::test]
    async fn test_detect_email() {
        let spans = detect("Contact: john.doe@example.com for details").await;
        assert!(spans.iter().any(|s| s.label() == "EMAIL"));
    }

    #[tokio::test]
    async fn test_detect_phone() {
        let spans = detect("Call (555) 123-4567").await;
        assert!(spans.iter().any(|s| s.label() == "PHONE"));
    }

    #[tokio::test]
    async fn test_detect_date_iso() {
        let spans = detect("admitted on 2023-01-05, discharged later").await;
        let date = spans.iter().find(|s| s.label() == "DATE").unwrap();
        assert_eq!(date.start(), 12);
        assert_eq!(date.end(), 22);
    }

    #[tokio::test]
    async fn test_offsets_are_code_points() {
        // Multibyte prefix before the email: byte and char offsets diverge
        let text = "日本語 test@example.com";
        let document = Document::new(text);
        let spans = RegexDetector::new()
            .unwrap()
            .detect(&document)
            .await
            .unwrap();

        let email = spans.iter().find(|s| s.label() == "EMAIL").unwrap();
        assert_eq!(email.start(), 4);
        assert_eq!(email.end(), 20);
        assert_eq!(document.slice(email.start(), email.end()), "test@example.com");
    }

    #[tokio::test]
    async fn test_confidence_threshold_filters_patterns() {
        let document = Document::new("card 4111 1111 1111 1111");
        let detector = RegexDetector::new().unwrap().with_confidence_threshold(0.9);
        let spans = detector.detect(&document).await.unwrap();
        // CREDIT_CARD confidence (0.7) is below the threshold
        assert!(spans.iter().all(|s| s.label() != "CREDIT_CARD"));
    }

    #[tokio::test]
    async fn test_no_detections_in_clean_text() {
        let spans = detect("nothing sensitive in this sentence").await;
        assert!(spans.is_empty());
    }

    #[tokio::test]
    async fn test_custom_registry() {
        let toml = r#"
            [patterns.badge]
            patterns = ['\bB-\d{4}\b']
            confidence = 0.9
            label = "BADGE"
        "#;
        let registry = PatternRegistry::from_toml(toml).unwrap();
        let detector = RegexDetector::with_registry(registry);
        let document = Document::new("badge B-1234 issued");
        let spans = detector.detect(&document).await.unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].label(), "BADGE");
    }
}
