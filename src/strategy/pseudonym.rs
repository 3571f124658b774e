//! Counter-based pseudonymization
//!
//! Replaces input with a formatted string and a running counter, e.g.
//! "Person 1", "Person 2". Declared document-consistent: within one
//! document, repeated occurrences of the same original receive the same
//! pseudonym through the dispatcher's cache; distinct originals advance
//! the counter.

use super::Strategy;
use crate::errors::{ScrubError, StrategyError};
use crate::models::Document;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pseudonymization by format string and counter
#[derive(Debug)]
pub struct CounterPseudonym {
    format: String,
    counter: AtomicU64,
}

impl CounterPseudonym {
    /// Create a pseudonymizer from a format string containing `{}`
    ///
    /// ```
    /// use scrub::strategy::{CounterPseudonym, Strategy};
    /// use scrub::models::Document;
    ///
    /// let strategy = CounterPseudonym::new("Person {}").unwrap();
    /// let doc = Document::new("test");
    /// assert_eq!(strategy.apply("test", "PERSON", &doc).unwrap(), "Person 1");
    /// ```
    pub fn new(format: impl Into<String>) -> Result<Self, ScrubError> {
        Self::with_initial(format, 1)
    }

    /// Create a pseudonymizer with a custom initial counter value
    pub fn with_initial(format: impl Into<String>, initial: u64) -> Result<Self, ScrubError> {
        let format = format.into();
        if !format.contains("{}") {
            return Err(ScrubError::Configuration(format!(
                "pseudonym format string must contain a replacement field '{{}}': {format}"
            )));
        }
        Ok(Self {
            format,
            counter: AtomicU64::new(initial),
        })
    }
}

impl Strategy for CounterPseudonym {
    fn apply(
        &self,
        _original: &str,
        _label: &str,
        _document: &Document,
    ) -> Result<String, StrategyError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Ok(self.format.replacen("{}", &n.to_string(), 1))
    }

    fn document_consistent(&self) -> bool {
        true
    }
}
