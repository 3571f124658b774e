//! Strategy dispatch
//!
//! Maps each resolved span's label to a configured strategy kind and
//! invokes the corresponding implementation to produce replacements.
//! Redact and suppress are prefilled as in-core built-ins; generalize and
//! pseudonymize implementations must be registered before a label maps to
//! them, otherwise dispatch fails rather than passing sensitive text
//! through.

use super::{RedactStrategy, Strategy, SuppressStrategy};
use crate::errors::StrategyError;
use crate::models::{Document, ResolvedSpan, Span, StrategyKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps labels to strategies and executes them
pub struct StrategyDispatcher {
    table: HashMap<String, StrategyKind>,
    default_kind: StrategyKind,
    implementations: HashMap<StrategyKind, Arc<dyn Strategy>>,
}

impl StrategyDispatcher {
    /// Create a dispatcher from a label table and a default kind
    pub fn new(table: HashMap<String, StrategyKind>, default_kind: StrategyKind) -> Self {
        let mut implementations: HashMap<StrategyKind, Arc<dyn Strategy>> = HashMap::new();
        implementations.insert(StrategyKind::Redact, Arc::new(RedactStrategy::new()));
        implementations.insert(StrategyKind::Suppress, Arc::new(SuppressStrategy::new()));

        Self {
            table,
            default_kind,
            implementations,
        }
    }

    /// Register (or replace) the implementation for a strategy kind
    pub fn register(&mut self, kind: StrategyKind, strategy: Arc<dyn Strategy>) {
        self.implementations.insert(kind, strategy);
    }

    /// Strategy kind configured for a label, falling back to the default
    pub fn kind_for(&self, label: &str) -> StrategyKind {
        self.table.get(label).copied().unwrap_or(self.default_kind)
    }

    /// Assign kinds and execute strategies for resolved spans
    ///
    /// The consistency cache lives in this call frame, keyed by
    /// `(label, normalized original)`, so equal pairs receive equal
    /// replacements within one document invocation and nothing leaks
    /// across documents or concurrent runs. Only strategies declaring
    /// [`Strategy::document_consistent`] are cached.
    pub fn complete(
        &self,
        document: &Document,
        spans: Vec<Span>,
    ) -> Result<Vec<ResolvedSpan>, StrategyError> {
        let mut cache: HashMap<(String, String), String> = HashMap::new();
        let mut completed = Vec::with_capacity(spans.len());

        for span in spans {
            let kind = self.kind_for(span.label());
            let original = document.slice(span.start(), span.end());

            let replacement = if kind == StrategyKind::Passthrough {
                original.to_string()
            } else {
                let strategy = self.implementations.get(&kind).ok_or_else(|| {
                    StrategyError::new(
                        span.label(),
                        format!("no implementation registered for strategy kind '{kind}'"),
                    )
                })?;

                if strategy.document_consistent() {
                    let key = (span.label().to_string(), normalize(original));
                    match cache.get(&key) {
                        Some(hit) => hit.clone(),
                        None => {
                            let fresh = strategy.apply(original, span.label(), document)?;
                            cache.insert(key, fresh.clone());
                            fresh
                        }
                    }
                } else {
                    strategy.apply(original, span.label(), document)?
                }
            };

            completed.push(ResolvedSpan::new(span, kind).completed(replacement));
        }

        Ok(completed)
    }
}

/// Cache key normalization: whitespace-trimmed, case-folded
fn normalize(original: &str) -> String {
    original.trim().to_lowercase()
}
