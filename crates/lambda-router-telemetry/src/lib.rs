//! Structured logging for lambda-router.
//!
//! This crate wires `tracing` to `tracing-subscriber` for function code:
//!
//! - [`init_logging`] installs a JSON (deployed) or pretty (local) formatter
//!   filtered by an [`EnvFilter`](tracing_subscriber::EnvFilter) level
//! - [`invocation_span`] opens the per-invocation span carrying the trace id
//! - [`targets`] names the log targets with a dedicated consumer
//!
//! # Example
//!
//! ```rust,ignore
//! use lambda_router_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::debug!(stage = "audit_log", phase = "before", "Entering stage");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, invocation_span, targets, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
