//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::time::Duration;

use lambda_router_core::DeploymentInfo;
use lambda_router_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

/// Service identity and invocation limits.
///
/// # Example
///
/// ```
/// use lambda_router_config::ServiceConfig;
///
/// let service = ServiceConfig::default();
/// assert_eq!(service.timeout_secs, 25);
/// assert_eq!(service.origin, "LambdaMiddlewareRouter::api");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Deployment environment (`ENVIRONMENT`).
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Release version (`VERSION`).
    #[serde(default = "default_version")]
    pub version: String,

    /// Build identifier (`BUILD`).
    #[serde(default = "default_build")]
    pub build: String,

    /// Logical origin stamped on audit records (`ORIGIN`).
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Function timeout in seconds (`TIMEOUT`).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Returns the timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the environment/version/build stamps for audit records.
    #[must_use]
    pub fn deployment(&self) -> DeploymentInfo {
        DeploymentInfo {
            environment: self.environment.clone(),
            version: self.version.clone(),
            build: self.build.clone(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            version: default_version(),
            build: default_build(),
            origin: default_origin(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_build() -> String {
    "1".to_string()
}

fn default_origin() -> String {
    "LambdaMiddlewareRouter::api".to_string()
}

const fn default_timeout_secs() -> u64 {
    25
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Table holding person records (`DYNAMO_TABLE`).
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
        }
    }
}

fn default_table_name() -> String {
    "LambdaMiddlewareRouter-table".to_string()
}

/// Fault injection settings for storage calls.
///
/// Nothing is injected unless `enabled` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChaosConfig {
    /// Master switch (`ENABLE_CHAOS`).
    #[serde(default)]
    pub enabled: bool,

    /// Fail every storage call (`INJECT_ERROR`).
    #[serde(default)]
    pub inject_error: bool,

    /// Delay added before every storage call, in milliseconds (`INJECT_LATENCY`).
    #[serde(default)]
    pub inject_latency_ms: u64,
}

impl ChaosConfig {
    /// Returns the latency to inject, if any.
    #[must_use]
    pub const fn latency(&self) -> Option<Duration> {
        if self.enabled && self.inject_latency_ms > 0 {
            Some(Duration::from_millis(self.inject_latency_ms))
        } else {
            None
        }
    }

    /// Returns `true` when storage calls must fail.
    #[must_use]
    pub const fn should_fail(&self) -> bool {
        self.enabled && self.inject_error
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable logs (development).
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level filter (`LOG_LEVEL`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (`LOG_FORMAT`).
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Builds the telemetry [`LogConfig`] for `service_name`.
    #[must_use]
    pub fn to_log_config(&self, service_name: &str) -> LogConfig {
        LogConfig {
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            service_name: service_name.to_string(),
            ..LogConfig::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
