//! Core data models
//!
//! Value types shared by every pipeline stage: the immutable [`Document`],
//! detector-produced [`Span`]s, resolver/dispatcher-produced
//! [`ResolvedSpan`]s, and the [`AnonymizationResult`] handed back to callers.

pub mod document;
pub mod result;
pub mod span;

pub use document::Document;
pub use result::{AnonymizationResult, AuditEntry};
pub use span::{ResolvedSpan, Span, StrategyKind};
