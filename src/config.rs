//! Anonymization configuration

use crate::errors::{Result, ScrubError};
use crate::models::StrategyKind;
use crate::resolver::ResolutionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// What to do when a detector reports malformed spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidSpanPolicy {
    /// Drop the offending detector's whole contribution with a warning;
    /// other detectors still contribute
    DropDetector,
    /// Abort the document with the span error
    AbortDocument,
}

impl Default for InvalidSpanPolicy {
    fn default() -> Self {
        Self::DropDetector
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Label to strategy kind table
    #[serde(default)]
    pub strategies: HashMap<String, StrategyKind>,

    /// Strategy kind for labels missing from the table
    #[serde(default)]
    pub default_strategy: StrategyKind,

    /// Handling of malformed detector output
    #[serde(default)]
    pub invalid_span_policy: InvalidSpanPolicy,

    /// Span priority policy for conflict resolution
    #[serde(default)]
    pub resolution: ResolutionPolicy,

    /// Dry-run mode (detect and resolve but don't rewrite)
    #[serde(default)]
    pub dry_run: bool,

    /// Path to a pattern library TOML file for the built-in detector
    pub pattern_library: Option<PathBuf>,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            strategies: HashMap::new(),
            default_strategy: StrategyKind::Redact,
            invalid_span_policy: InvalidSpanPolicy::default(),
            resolution: ResolutionPolicy::default(),
            dry_run: false,
            pattern_library: None,
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(ScrubError::Configuration(format!(
                    "Pattern library file not found: {}",
                    path.display()
                )));
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(ScrubError::Configuration(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                )));
            }
        }

        self.audit.validate()?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SCRUB_DEFAULT_STRATEGY") {
            self.default_strategy = parse_strategy_kind(&val)?;
        }

        if let Ok(val) = std::env::var("SCRUB_INVALID_SPAN_POLICY") {
            self.invalid_span_policy = match val.to_lowercase().as_str() {
                "drop_detector" => InvalidSpanPolicy::DropDetector,
                "abort_document" => InvalidSpanPolicy::AbortDocument,
                _ => {
                    return Err(ScrubError::Configuration(format!(
                        "Invalid SCRUB_INVALID_SPAN_POLICY: {val}"
                    )))
                }
            };
        }

        if let Ok(val) = std::env::var("SCRUB_DRY_RUN") {
            self.dry_run = val.parse().map_err(|_| {
                ScrubError::Configuration(format!("Invalid SCRUB_DRY_RUN value: {val}"))
            })?;
        }

        if let Ok(val) = std::env::var("SCRUB_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

fn parse_strategy_kind(val: &str) -> Result<StrategyKind> {
    match val.to_lowercase().as_str() {
        "redact" => Ok(StrategyKind::Redact),
        "generalize" => Ok(StrategyKind::Generalize),
        "pseudonymize" => Ok(StrategyKind::Pseudonymize),
        "suppress" => Ok(StrategyKind::Suppress),
        "passthrough" => Ok(StrategyKind::Passthrough),
        _ => Err(ScrubError::Configuration(format!(
            "Invalid strategy kind: {val}"
        ))),
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled {
            if let Some(parent) = self.log_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        ScrubError::Configuration(format!(
                            "Failed to create audit log directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SCRUB_AUDIT_ENABLED") {
            self.enabled = val.parse().map_err(|_| {
                ScrubError::Configuration(format!("Invalid SCRUB_AUDIT_ENABLED value: {val}"))
            })?;
        }

        if let Ok(val) = std::env::var("SCRUB_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("SCRUB_AUDIT_JSON_FORMAT") {
            self.json_format = val.parse().map_err(|_| {
                ScrubError::Configuration(format!("Invalid SCRUB_AUDIT_JSON_FORMAT value: {val}"))
            })?;
        }

        Ok(())
    }
}
