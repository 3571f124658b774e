// Scrub - Multi-Detector Text Anonymization Engine
// Copyright (c) 2026 Scrub Contributors
// Licensed under the MIT License

//! # Scrub - Text Anonymization Engine
//!
//! Scrub is a reusable, technique-agnostic anonymization layer: it takes
//! possibly-overlapping, possibly-conflicting detections from multiple
//! independent detectors and produces a single position-correct rewrite of
//! the input text, plus an audit mapping of what was replaced where.
//!
//! ## Overview
//!
//! The pipeline for one document:
//!
//! 1. **Detection** - every configured [`detector::Detector`] runs
//!    concurrently over the same immutable [`models::Document`] and
//!    returns candidate [`models::Span`]s
//! 2. **Conflict resolution** - the [`resolver::ConflictResolver`] selects
//!    a non-overlapping subset under a deterministic, configurable
//!    priority policy
//! 3. **Strategy dispatch** - the [`strategy::StrategyDispatcher`] maps
//!    each survivor's label to an anonymization strategy (redact,
//!    generalize, pseudonymize, suppress) and produces its replacement
//! 4. **Rewrite** - the [`rewriter`] applies all replacements in one
//!    linear pass on code point boundaries, emitting the output text and
//!    the audit mapping
//!
//! ## Quick Start
//!
//! ```no_run
//! use scrub::config::AnonymizationConfig;
//! use scrub::engine::AnonymizationEngine;
//!
//! #[tokio::main]
//! async fn main() -> scrub::Result<()> {
//!     let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!
//!     let result = engine
//!         .anonymize("Alice was admitted on 2023-01-05, contact alice@example.com")
//!         .await?;
//!
//!     println!("{}", result.output_text);
//!     for entry in &result.audit {
//!         println!("{} -> {}", entry.label, entry.replacement);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result`] with [`errors::ScrubError`].
//! A document is anonymized all-or-nothing: collaborator failures abort it
//! rather than leaving sensitive text in place, and malformed detector
//! output is either dropped per-detector with a warning or aborts the
//! document, depending on [`config::InvalidSpanPolicy`].
//!
//! ## Logging
//!
//! Scrub uses structured logging with the `tracing` crate; see
//! [`logging::init_logging`] for a ready-made console subscriber.

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod models;
pub mod report;
pub mod resolver;
pub mod rewriter;
pub mod strategy;
pub mod utils;

pub use config::AnonymizationConfig;
pub use engine::AnonymizationEngine;
pub use errors::{Result, ScrubError};
pub use models::{AnonymizationResult, AuditEntry, Document, ResolvedSpan, Span, StrategyKind};
