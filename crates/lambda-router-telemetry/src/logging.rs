//! Structured logging for lambda-router.
//!
//! Function logs go to stdout, where the platform collects them. JSON output
//! is the default so every line can be queried by field; the pretty format is
//! meant for local invocation.
//!
//! # Example
//!
//! ```rust,ignore
//! use lambda_router_telemetry::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig::default();
//! init_logging(&config)?;
//!
//! tracing::info!(trace_id = "c6af9ac6", "Init");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Install a subscriber at all. Off when the host already installed one.
    pub enabled: bool,

    /// Filter directive, e.g. `info` or `lambda_router=debug,warn`.
    pub level: String,

    /// One JSON object per line (deployed) instead of pretty output (local).
    pub json_format: bool,

    /// Record the source file and line of each event.
    pub with_source: bool,

    /// Service name recorded on the invocation span.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            with_source: false,
            service_name: "lambda-router".to_string(),
        }
    }
}

impl LogConfig {
    /// Local invocation: pretty debug output with source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            with_source: true,
            ..Self::default()
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn format_layer(config: &LogConfig, filter: EnvFilter) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_file(config.with_source)
        .with_line_number(config.with_source)
        .with_target(true);

    if config.json_format {
        // Flatten event fields so `trace_id` and friends sit at the top level.
        layer
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_filter(filter)
            .boxed()
    } else {
        layer.pretty().with_filter(filter).boxed()
    }
}

/// Installs the global subscriber. Call once, at cold start.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidConfig`] for an empty service name and
/// [`TelemetryError::LoggingInit`] for a bad filter or when a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    if config.service_name.trim().is_empty() {
        return Err(TelemetryError::InvalidConfig(
            "service_name must not be empty".to_string(),
        ));
    }

    let filter = create_env_filter(&config.level)?;

    tracing_subscriber::registry()
        .with(format_layer(config, filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parses a filter directive.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}

/// Creates the span that wraps one invocation.
///
/// Every event logged while the span is entered carries the trace id, so log
/// lines can be joined with the audit record.
#[must_use]
pub fn invocation_span(service_name: &str, trace_id: &str) -> Span {
    tracing::info_span!(
        "invocation",
        service.name = %service_name,
        trace_id = %trace_id,
    )
}

/// Log targets with a dedicated consumer.
pub mod targets {
    /// Target of emitted audit records.
    pub const AUDIT: &str = "audit";
}
