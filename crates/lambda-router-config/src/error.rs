//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration source could not be turned into a [`RouterConfig`].
///
/// [`RouterConfig`]: crate::RouterConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// Path to the file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Neither `toml` nor `json`.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Malformed TOML.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The `.env` file exists but is malformed.
    #[error("invalid .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A function variable (`TIMEOUT`, `ENABLE_CHAOS`, ...) has the wrong shape.
    #[error("variable {name} is invalid: {expected}")]
    InvalidVariable {
        /// Variable name.
        name: String,
        /// What the variable should look like.
        expected: &'static str,
    },

    /// A loaded value breaks a rule checked by [`RouterConfig::validate`].
    ///
    /// [`RouterConfig::validate`]: crate::RouterConfig::validate
    #[error("{field} {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `service.timeout_secs`.
        field: &'static str,
        /// The broken rule.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_variable(name: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidVariable {
            name: name.into(),
            expected,
        }
    }

    pub(crate) fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
