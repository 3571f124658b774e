//! Audit logging for anonymization operations
//!
//! Records completed results with SHA-256-hashed originals. Plaintext
//! sensitive values never reach the log. Persistence beyond this append-only
//! log (databases, audit trails for re-identification control) is the
//! concern of surrounding tooling.

pub mod logger;

pub use logger::AuditLogger;
