//! Discrete probability distribution over replacement values
//!
//! Stores normalized weights in cumulative form. Sampling takes a uniform
//! roll in [0, 1) rather than an RNG handle, which keeps the distribution
//! deterministic to test.

use crate::errors::ScrubError;

/// A normalized discrete distribution in cumulative form
#[derive(Debug, Clone)]
pub struct DiscreteDistribution {
    cumulative: Vec<f64>,
}

impl DiscreteDistribution {
    /// Build a distribution from non-negative weights
    ///
    /// Weights are normalized so they sum to 1; they need not on input.
    pub fn new(weights: &[f64]) -> Result<Self, ScrubError> {
        if weights.is_empty() {
            return Err(ScrubError::Configuration(
                "cannot create an empty probability distribution".to_string(),
            ));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ScrubError::Configuration(
                "distribution weights must be finite and non-negative".to_string(),
            ));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(ScrubError::Configuration(
                "distribution weights must not all be zero".to_string(),
            ));
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut acc = 0.0;
        for weight in weights {
            acc += weight / total;
            cumulative.push(acc);
        }
        // Guard against float drift on the last bucket
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }
        Ok(Self { cumulative })
    }

    /// Uniform distribution over `n` values
    pub fn uniform(n: usize) -> Result<Self, ScrubError> {
        Self::new(&vec![1.0; n])
    }

    /// Number of outcomes
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// A valid distribution is never empty; kept for API symmetry
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Map a uniform roll in [0, 1) to an outcome index
    pub fn sample(&self, roll: f64) -> usize {
        self.cumulative
            .iter()
            .position(|&threshold| roll < threshold)
            .unwrap_or(self.cumulative.len() - 1)
    }
}
