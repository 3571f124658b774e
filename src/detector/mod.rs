//! Detection boundary
//!
//! Detectors are external collaborators: rule-based, statistical, or
//! anything else that can return candidate spans over an immutable
//! document. Adapters implement [`Detector`], normalizing whatever offset
//! and labeling scheme the underlying engine uses into code point
//! [`Span`]s (the document's byte-to-char helper exists for byte-offset
//! engines). Timeouts and retries are the adapter's concern; the engine
//! surfaces an adapter failure as fatal for the document.

pub mod patterns;
pub mod regex;

use crate::errors::DetectorError;
use crate::models::{Document, Span};
use async_trait::async_trait;

pub use self::regex::RegexDetector;
pub use patterns::PatternRegistry;

/// Trait for detector implementations
#[async_trait]
pub trait Detector: Send + Sync {
    /// Stable identifier, recorded as the `source` of produced spans
    fn id(&self) -> &str;

    /// Detect candidate spans in the document
    ///
    /// Offsets must be code point offsets into the document text.
    /// Detectors over the same document run concurrently, so this takes
    /// `&self` and must not rely on exclusive access.
    async fn detect(&self, document: &Document) -> Result<Vec<Span>, DetectorError>;
}
