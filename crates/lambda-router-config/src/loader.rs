//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::{ConfigError, LogFormat, RouterConfig};

/// Environment variables understood by [`ConfigLoader::with_env`].
pub const ENV_KEYS: &[&str] = &[
    "ENVIRONMENT",
    "VERSION",
    "BUILD",
    "ORIGIN",
    "TIMEOUT",
    "DYNAMO_TABLE",
    "ENABLE_CHAOS",
    "INJECT_ERROR",
    "INJECT_LATENCY",
    "LOG_LEVEL",
    "LOG_FORMAT",
];

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Process environment, using the flat function variables
///    (`ENVIRONMENT`, `TIMEOUT`, `DYNAMO_TABLE`, ...)
/// 4. Explicit key/value overrides
///
/// # Example
///
/// ```no_run
/// use lambda_router_config::ConfigLoader;
///
/// # fn main() -> Result<(), lambda_router_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("lambda-router.toml")?
///     .with_env()
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: RouterConfig,
    read_env: bool,
    overrides: Vec<(String, String)>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RouterConfig::default(),
            read_env: false,
            overrides: Vec::new(),
        }
    }

    /// Start with default configuration values.
    ///
    /// This is called automatically by `new()`, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = RouterConfig::default();
        self
    }

    /// Start with the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = RouterConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = RouterConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats, chosen by extension.
    ///
    /// Unknown sections and fields are rejected.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::file_not_found(path),
            _ => ConfigError::unreadable(path, e),
        })?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        self.with_string(&content, format)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in `"toml"` or `"json"` format.
    ///
    /// # Example
    ///
    /// ```
    /// use lambda_router_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [storage]
    ///     table_name = "people-dev"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.storage.table_name, "people-dev");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        // Parse strictly first so unknown keys and bad types are reported
        // against the source format.
        let layer = match format.to_lowercase().as_str() {
            "toml" => {
                toml::from_str::<RouterConfig>(content)?;
                serde_json::to_value(toml::from_str::<toml::Table>(content)?)?
            }
            "json" => {
                serde_json::from_str::<RouterConfig>(content)?;
                serde_json::from_str::<Value>(content)?
            }
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        let mut merged = serde_json::to_value(&self.config)?;
        merge(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(self)
    }

    /// Read the function variables from the process environment on `load`.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.read_env = true;
        self
    }

    /// Load a `.env` file into the process environment, if one exists.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply explicit variables after the environment.
    ///
    /// Keys use the same names as the environment (`TIMEOUT`, `DYNAMO_TABLE`, ...).
    ///
    /// # Example
    ///
    /// ```
    /// use lambda_router_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_vars([("TIMEOUT", "3"), ("ENABLE_CHAOS", "true")])
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.service.timeout_secs, 3);
    /// assert!(config.chaos.enabled);
    /// ```
    #[must_use]
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Finalize and return the validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - A variable cannot be parsed
    /// - Configuration validation fails
    pub fn load(mut self) -> Result<RouterConfig, ConfigError> {
        if self.read_env {
            for key in ENV_KEYS {
                if let Ok(value) = env::var(key) {
                    self.apply_var(key, &value)?;
                }
            }
        }

        for (key, value) in std::mem::take(&mut self.overrides) {
            self.apply_var(&key, &value)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    fn apply_var(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let service = &mut self.config.service;
        let chaos = &mut self.config.chaos;

        match key {
            "ENVIRONMENT" => service.environment = value.to_string(),
            "VERSION" => service.version = value.to_string(),
            "BUILD" => service.build = value.to_string(),
            "ORIGIN" => service.origin = value.to_string(),
            "TIMEOUT" => service.timeout_secs = parse_u64(key, value, "expected integer seconds")?,
            "DYNAMO_TABLE" => self.config.storage.table_name = value.to_string(),
            "ENABLE_CHAOS" => chaos.enabled = parse_flag(key, value)?,
            "INJECT_ERROR" => chaos.inject_error = parse_flag(key, value)?,
            // Unset latency is exported as an empty string.
            "INJECT_LATENCY" if value.is_empty() => chaos.inject_latency_ms = 0,
            "INJECT_LATENCY" => {
                chaos.inject_latency_ms = parse_u64(key, value, "expected integer milliseconds")?;
            }
            "LOG_LEVEL" => self.config.logging.level = value.to_string(),
            "LOG_FORMAT" => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::invalid_variable(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            _ => {}
        }

        Ok(())
    }
}

/// Overlays `layer` on `base`: tables merge key by key, anything else
/// replaces the base value.
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}

fn parse_u64(key: &str, value: &str, expected: &'static str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid_variable(key, expected))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::invalid_variable(key, "expected boolean"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
