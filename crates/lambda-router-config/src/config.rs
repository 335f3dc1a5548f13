//! Main configuration types.
//!
//! This module provides the top-level [`RouterConfig`] struct.

use serde::{Deserialize, Serialize};

use lambda_router_telemetry::create_env_filter;

use crate::{ChaosConfig, ConfigError, LogFormat, LoggingConfig, ServiceConfig, StorageConfig};

/// Complete function configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use lambda_router_config::RouterConfig;
///
/// let config = RouterConfig::default();
/// assert_eq!(config.storage.table_name, "LambdaMiddlewareRouter-table");
/// assert!(!config.chaos.enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Service identity and timeout.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Fault injection settings.
    #[serde(default)]
    pub chaos: ChaosConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RouterConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `service.timeout_secs` is zero
    /// - `service.environment`, `service.origin` or `storage.table_name` is empty
    /// - `logging.level` is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "service.timeout_secs",
                "must be greater than 0",
            ));
        }

        for (field, value) in [
            ("service.environment", &self.service.environment),
            ("service.origin", &self.service.origin),
            ("storage.table_name", &self.storage.table_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_value(field, "must not be empty"));
            }
        }

        create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// Local development preset: pretty debug logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
            },
            ..Self::default()
        }
    }

    /// Deployed preset: JSON info logs, `prod` environment.
    #[must_use]
    pub fn production() -> Self {
        Self {
            service: ServiceConfig {
                environment: "prod".to_string(),
                ..ServiceConfig::default()
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Json,
            },
            ..Self::default()
        }
    }
}
