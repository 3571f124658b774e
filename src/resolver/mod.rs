//! Conflict resolution for overlapping detections
//!
//! Multiple independent detectors disagree: they produce overlapping,
//! nested and duplicate spans over the same document. The resolver turns
//! that unordered collection into a non-overlapping sequence, ascending by
//! start offset, that every downstream stage relies on.
//!
//! The algorithm is interval scheduling with priority rather than pure
//! maximum-count scheduling: a confident long match must win over a short
//! incidental overlapping match from a weaker detector, which
//! count-maximizing selection gets wrong. Candidates are sorted by a
//! configurable priority order, greedily accepted unless they overlap an
//! already-accepted span, then re-sorted by start offset. O(n log n) sort
//! plus a scan; the overlap graph is never materialized.

use crate::errors::InvalidSpanError;
use crate::models::{Document, Span};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One comparison key in the priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityKey {
    /// Higher confidence wins
    Confidence,
    /// Shorter span wins (more specific on ties)
    Length,
    /// Earlier start offset wins
    Start,
    /// Lower configured source rank wins; unranked detectors lose to ranked
    Source,
}

/// Configurable span priority policy
///
/// Real anonymization deployments differ in how they rank disagreeing
/// detectors, so the order of comparison keys is configuration rather than
/// hard-coded. The default is confidence-descending, then length-ascending,
/// then start-ascending. Whatever the configured keys, a final positional
/// comparison guarantees a deterministic total order, so resolver output
/// never depends on detector arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Comparison keys, applied in order until one differs
    #[serde(default = "default_priority_keys")]
    pub keys: Vec<PriorityKey>,
    /// Detector ranks for [`PriorityKey::Source`]; lower rank wins
    #[serde(default)]
    pub source_ranks: HashMap<String, u32>,
}

fn default_priority_keys() -> Vec<PriorityKey> {
    vec![PriorityKey::Confidence, PriorityKey::Length, PriorityKey::Start]
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            keys: default_priority_keys(),
            source_ranks: HashMap::new(),
        }
    }
}

impl ResolutionPolicy {
    fn rank(&self, source: &str) -> u32 {
        self.source_ranks.get(source).copied().unwrap_or(u32::MAX)
    }

    /// Compare two candidates; `Ordering::Less` means `a` has priority
    pub fn compare(&self, a: &Span, b: &Span) -> Ordering {
        for key in &self.keys {
            let ordering = match key {
                PriorityKey::Confidence => b.confidence().total_cmp(&a.confidence()),
                PriorityKey::Length => a.len().cmp(&b.len()),
                PriorityKey::Start => a.start().cmp(&b.start()),
                PriorityKey::Source => self.rank(a.source()).cmp(&self.rank(b.source())),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        // Deterministic fallback regardless of configured keys
        a.start()
            .cmp(&b.start())
            .then_with(|| a.end().cmp(&b.end()))
            .then_with(|| a.label().cmp(b.label()))
            .then_with(|| a.source().cmp(b.source()))
    }
}

/// Turns unordered, possibly-overlapping candidates into the canonical
/// non-overlapping sequence
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    policy: ResolutionPolicy,
}

impl ConflictResolver {
    /// Create a resolver with the given priority policy
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    /// The active policy
    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Resolve candidates into a maximal non-overlapping ordered subset
    ///
    /// Every candidate is validated against the document before sorting;
    /// out-of-bounds offsets fail with [`InvalidSpanError`], never get
    /// clamped. Losers of an overlap are dropped entirely, not merged or
    /// truncated: partial redaction of half a detected entity is never
    /// produced.
    pub fn resolve(
        &self,
        document: &Document,
        mut candidates: Vec<Span>,
    ) -> Result<Vec<Span>, InvalidSpanError> {
        for span in &candidates {
            span.validate_bounds(document)?;
        }

        candidates.sort_by(|a, b| self.policy.compare(a, b));

        let mut accepted: Vec<Span> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(winner) = accepted.iter().find(|kept| kept.overlaps(&candidate)) {
                tracing::debug!(
                    document = %document.id(),
                    label = candidate.label(),
                    source = candidate.source(),
                    dropped = ?(candidate.start(), candidate.end()),
                    kept = ?(winner.start(), winner.end()),
                    "Dropping overlapping candidate span"
                );
                continue;
            }
            accepted.push(candidate);
        }

        // Canonical output order for all downstream stages
        accepted.sort_by_key(|span| span.start());
        Ok(accepted)
    }
}
