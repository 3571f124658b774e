//! Randomized response strategy
//!
//! Replaces the input with a value drawn from a weighted distribution over
//! a fixed value list. The value list must be exhaustive over possible
//! inputs unless a default value is configured for unknown inputs.
//! Declared document-consistent so repeated occurrences of the same input
//! within a document report the same drawn value.

use super::Strategy;
use crate::errors::{ScrubError, StrategyError};
use crate::models::Document;
use crate::utils::DiscreteDistribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Randomized response over a weighted value list
pub struct RandomizedResponse {
    values: Vec<String>,
    distribution: DiscreteDistribution,
    default_value: Option<String>,
    rng: Mutex<StdRng>,
}

impl RandomizedResponse {
    /// Create a randomized response strategy from values and weights
    ///
    /// `weights.len()` must equal `values.len()`.
    pub fn new(values: Vec<String>, weights: &[f64]) -> Result<Self, ScrubError> {
        if values.is_empty() {
            return Err(ScrubError::Configuration(
                "randomized response requires at least one value".to_string(),
            ));
        }
        if values.len() != weights.len() {
            return Err(ScrubError::Configuration(format!(
                "size of probability distribution ({}) does not match values ({})",
                weights.len(),
                values.len()
            )));
        }
        Ok(Self {
            values,
            distribution: DiscreteDistribution::new(weights)?,
            default_value: None,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Create a randomized response strategy with uniform weights
    pub fn uniform(values: Vec<String>) -> Result<Self, ScrubError> {
        if values.is_empty() {
            return Err(ScrubError::Configuration(
                "randomized response requires at least one value".to_string(),
            ));
        }
        let distribution = DiscreteDistribution::uniform(values.len())?;
        Ok(Self {
            values,
            distribution,
            default_value: None,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Return this value for inputs outside the value list instead of failing
    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Seed the internal RNG, for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }
}

impl Strategy for RandomizedResponse {
    fn apply(
        &self,
        original: &str,
        label: &str,
        _document: &Document,
    ) -> Result<String, StrategyError> {
        if !self.values.iter().any(|v| v == original) {
            return match &self.default_value {
                Some(default) => Ok(default.clone()),
                None => Err(StrategyError::new(
                    label,
                    format!("input not covered by randomized response values: {original:?}"),
                )),
            };
        }
        let roll = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| StrategyError::new(label, "randomized response RNG poisoned"))?;
            rng.gen::<f64>()
        };
        let index = self.distribution.sample(roll);
        Ok(self.values[index].clone())
    }

    fn document_consistent(&self) -> bool {
        true
    }
}
