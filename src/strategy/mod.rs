//! Anonymization strategies
//!
//! Strategies are polymorphic over one capability: given the original
//! substring, its label and the containing document, produce a replacement
//! string. [`RedactStrategy`] and [`SuppressStrategy`] ship in-core as
//! trivial built-ins; generalization and pseudonymization depend on domain
//! knowledge and are supplied by collaborators (stock implementations are
//! provided here as registrable defaults). The [`dispatcher`] maps labels
//! to strategy kinds and enforces per-document consistency.

pub mod dispatcher;
pub mod generalize;
pub mod pseudonym;
pub mod randomized;
pub mod redact;
pub mod suppress;

use crate::errors::StrategyError;
use crate::models::Document;

pub use dispatcher::StrategyDispatcher;
pub use generalize::GeneralizeStrategy;
pub use pseudonym::CounterPseudonym;
pub use randomized::RandomizedResponse;
pub use redact::RedactStrategy;
pub use suppress::{MaskStrategy, SuppressStrategy};

/// Trait for anonymization strategy implementations
pub trait Strategy: Send + Sync {
    /// Produce a replacement for the original substring
    fn apply(
        &self,
        original: &str,
        label: &str,
        document: &Document,
    ) -> Result<String, StrategyError>;

    /// Whether equal `(label, original)` pairs must receive the same
    /// replacement within one document invocation
    ///
    /// When true, the dispatcher consults its per-document cache before
    /// invoking the strategy.
    fn document_consistent(&self) -> bool {
        false
    }
}
