//! Typed configuration for lambda-router functions.
//!
//! This crate provides a strongly-typed configuration with support for:
//! - TOML and JSON configuration files
//! - The flat function environment (`ENVIRONMENT`, `VERSION`, `BUILD`,
//!   `TIMEOUT`, `DYNAMO_TABLE`, `ENABLE_CHAOS`, `INJECT_ERROR`, `INJECT_LATENCY`)
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env → explicit overrides)
//!
//! # Overview
//!
//! [`RouterConfig`] groups four sections:
//!
//! - [`ServiceConfig`] - Environment, version, build, origin and timeout
//! - [`StorageConfig`] - Table name
//! - [`ChaosConfig`] - Fault injection for storage calls
//! - [`LoggingConfig`] - Log level and format
//!
//! # Example
//!
//! ```no_run
//! use lambda_router_config::ConfigLoader;
//!
//! # fn main() -> Result<(), lambda_router_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_dotenv()?
//!     .with_env()
//!     .load()?;
//!
//! println!("Timeout: {}s", config.service.timeout_secs);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [service]
//! environment = "prod"
//! version = "1.0.0"
//! build = "1"
//! origin = "LambdaMiddlewareRouter::api"
//! timeout_secs = 25
//!
//! [storage]
//! table_name = "LambdaMiddlewareRouter-table"
//!
//! [chaos]
//! enabled = false
//! inject_error = true
//! inject_latency_ms = 5000
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::RouterConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_KEYS};
pub use schema::*;
