//! Generalization strategy
//!
//! Replaces input with a more general value: either a constant, or a lookup
//! into a replacement table with a required default for unknown inputs.

use super::Strategy;
use crate::errors::StrategyError;
use crate::models::Document;
use std::collections::HashMap;

enum Replacement {
    Constant(String),
    Table {
        map: HashMap<String, String>,
        default: String,
    },
}

/// Generalization strategy
pub struct GeneralizeStrategy {
    replacement: Replacement,
}

impl GeneralizeStrategy {
    /// Generalize every input to the same constant, e.g. "<NAME>"
    pub fn constant(replacement: impl Into<String>) -> Self {
        Self {
            replacement: Replacement::Constant(replacement.into()),
        }
    }

    /// Generalize via a lookup table, falling back to `default` for
    /// inputs the table does not cover
    pub fn table(map: HashMap<String, String>, default: impl Into<String>) -> Self {
        Self {
            replacement: Replacement::Table {
                map,
                default: default.into(),
            },
        }
    }
}

impl Strategy for GeneralizeStrategy {
    fn apply(
        &self,
        original: &str,
        _label: &str,
        _document: &Document,
    ) -> Result<String, StrategyError> {
        match &self.replacement {
            Replacement::Constant(value) => Ok(value.clone()),
            Replacement::Table { map, default } => {
                Ok(map.get(original).unwrap_or(default).clone())
            }
        }
    }
}
