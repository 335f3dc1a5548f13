//! Built-in middleware stages.
//!
//! The standard pipeline registers them in this order:
//!
//! 1. [`error_classifier`] - Turn a pending error into a coded envelope
//! 2. [`audit_log`] - Create and emit the per-invocation audit record
//! 3. [`request_normalizer`] - Build the normalized request from the event
//!
//! `after` phases run in reverse, so the classifier always sees the final
//! error.

pub mod audit_log;
pub mod error_classifier;
pub mod request_normalizer;

pub use audit_log::{AuditLogMiddleware, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use error_classifier::ErrorClassifierMiddleware;
pub use request_normalizer::{normalize_path, parse_body, ProxyEvent, RequestNormalizerMiddleware};
