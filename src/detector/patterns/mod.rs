//! Pattern library for the built-in regex detector

use crate::errors::ScrubError;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this label
    pub patterns: Vec<String>,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Span label, e.g. "EMAIL"
    pub label: String,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Compiled regex
    pub regex: Regex,
    /// Span label
    pub label: String,
    /// Confidence score
    pub confidence: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: HashMap<String, PatternDefinition>,
}

/// Pattern registry for the regex detector
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    patterns_by_label: HashMap<String, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrubError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScrubError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ScrubError> {
        let library: PatternLibrary = toml::from_str(content)?;

        let mut patterns = Vec::new();
        let mut patterns_by_label: HashMap<String, Vec<CompiledPattern>> = HashMap::new();

        for (name, def) in library.patterns {
            if def.label.trim().is_empty() {
                return Err(ScrubError::Configuration(format!(
                    "Empty label in pattern '{name}'"
                )));
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).map_err(|e| {
                    ScrubError::Configuration(format!(
                        "Invalid regex in pattern '{name}': {pattern_str}: {e}"
                    ))
                })?;

                let compiled = CompiledPattern {
                    regex,
                    label: def.label.clone(),
                    confidence: def.confidence.clamp(0.0, 1.0),
                };

                patterns.push(compiled.clone());
                patterns_by_label
                    .entry(def.label.clone())
                    .or_default()
                    .push(compiled);
            }
        }

        Ok(Self {
            patterns,
            patterns_by_label,
        })
    }

    /// Create a registry with the embedded default patterns
    pub fn default_patterns() -> Result<Self, ScrubError> {
        let default_toml = include_str!("../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns for a specific label
    pub fn patterns_for_label(&self, label: &str) -> Option<&[CompiledPattern]> {
        self.patterns_by_label.get(label).map(|v| v.as_slice())
    }
}
