//! Audit logger for anonymization operations

use crate::errors::{Result, ScrubError};
use crate::models::{AnonymizationResult, Document};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    document_id: String,
    detections_count: usize,
    processing_time_ms: u64,
    detections: Vec<AuditDetection>,
}

/// Audit detection entry (with hashed original)
#[derive(Debug, Serialize)]
struct AuditDetection {
    label: String,
    strategy: String,
    confidence: f32,
    original_start: usize,
    original_end: usize,
    output_start: usize,
    output_end: usize,
    /// SHA-256 hash of the original value (never log plaintext)
    value_hash: String,
}

/// Audit logger for anonymization operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScrubError::Audit(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
        })
    }

    /// Log a completed anonymization result
    pub fn log(&self, document: &Document, result: &AnonymizationResult) -> Result<()> {
        let detections = result
            .audit
            .iter()
            .map(|entry| AuditDetection {
                label: entry.label.clone(),
                strategy: entry.strategy.to_string(),
                confidence: result
                    .resolved
                    .iter()
                    .find(|r| r.span.start() == entry.original_start)
                    .map(|r| r.span.confidence())
                    .unwrap_or(0.0),
                original_start: entry.original_start,
                original_end: entry.original_end,
                output_start: entry.output_start,
                output_end: entry.output_end,
                value_hash: hash_value(document.slice(entry.original_start, entry.original_end)),
            })
            .collect();

        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            document_id: result.document_id.to_string(),
            detections_count: result.audit.len(),
            processing_time_ms: result.processing_time_ms,
            detections,
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                ScrubError::Audit(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        if self.json_format {
            let json_line = serde_json::to_string(entry)
                .map_err(|e| ScrubError::Audit(format!("Failed to serialize audit entry: {e}")))?;
            writeln!(file, "{json_line}")
                .map_err(|e| ScrubError::Audit(format!("Failed to write audit entry: {e}")))?;
        } else {
            writeln!(
                file,
                "[{}] Document: {} | Detections: {} | Time: {}ms",
                entry.timestamp,
                entry.document_id,
                entry.detections_count,
                entry.processing_time_ms
            )
            .map_err(|e| ScrubError::Audit(format!("Failed to write audit entry: {e}")))?;
        }

        Ok(())
    }
}

/// Hash a sensitive value using SHA-256
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditEntry, ResolvedSpan, Span, StrategyKind};
    use tempfile::tempdir;

    fn sample_result(document: &Document) -> AnonymizationResult {
        let span = Span::new(9, 25, "EMAIL", 0.95, "regex").unwrap();
        let resolved = vec![ResolvedSpan::new(span, StrategyKind::Redact).completed("[EMAIL]")];
        let audit = vec![AuditEntry {
            label: "EMAIL".to_string(),
            strategy: StrategyKind::Redact,
            original_start: 9,
            original_end: 25,
            output_start: 9,
            output_end: 16,
            replacement: "[EMAIL]".to_string(),
        }];
        AnonymizationResult::new(
            document.id(),
            "Contact: [EMAIL]".to_string(),
            resolved,
            audit,
            4,
        )
    }

    #[test]
    fn test_hash_is_stable_and_distinct() {
        let h1 = hash_value("test@example.com");
        let h2 = hash_value("test@example.com");
        let h3 = hash_value("other@example.com");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_log_never_contains_plaintext() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true).unwrap();

        let document = Document::new("Contact: test@example.com");
        let result = sample_result(&document);
        logger.log(&document, &result).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains(&result.document_id.to_string()));
        assert!(content.contains("EMAIL"));
        assert!(!content.contains("test@example.com"));
    }

    #[test]
    fn test_plain_text_format() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), false).unwrap();

        let document = Document::new("Contact: test@example.com");
        logger.log(&document, &sample_result(&document)).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Detections: 1"));
        assert!(!content.contains("test@example.com"));
    }

    #[test]
    fn test_entries_append() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true).unwrap();

        let document = Document::new("Contact: test@example.com");
        logger.log(&document, &sample_result(&document)).unwrap();
        logger.log(&document, &sample_result(&document)).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
