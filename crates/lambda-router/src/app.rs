//! Function application.
//!
//! An [`App`] is built once per process and handles every invocation. It owns
//! the configuration, the standard middleware [`Pipeline`] and the route
//! dispatcher with its service [`Container`].

use crate::routes::register_routes;
use crate::storage::{ChaosPersonStore, MemoryPersonStore, PersonStore};
use lambda_router_config::{ConfigError, ConfigLoader, RouterConfig};
use lambda_router_core::di::Container;
use lambda_router_core::{InvocationContext, ProxyResponse};
use lambda_router_dispatch::{RouteDispatcher, Router};
use lambda_router_middleware::stages::{AuditLogMiddleware, AuditSink};
use lambda_router_middleware::{HandlerContext, Pipeline};
use lambda_router_telemetry::{invocation_span, TelemetryError};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, Instrument};

/// Errors raised while starting the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Loads configuration: defaults, then an optional file, then `.env` and the
/// process environment.
///
/// # Errors
///
/// Returns [`ConfigError`] if a source cannot be read or a value is invalid.
pub fn load_config(file: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    let mut loader = ConfigLoader::new().with_defaults();
    if let Some(path) = file {
        loader = loader.with_file(path)?;
    }
    loader.with_dotenv()?.with_env().load()
}

/// The function application.
///
/// # Example
///
/// ```
/// use lambda_router::app::App;
/// use lambda_router::config::RouterConfig;
/// use lambda_router::core::InvocationContext;
/// use serde_json::json;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let app = App::builder(RouterConfig::default()).build();
/// let response = app
///     .handle(
///         json!({"httpMethod": "GET", "path": "/v1/ping"}),
///         InvocationContext::new("req-1", Duration::from_secs(25)),
///     )
///     .await;
///
/// assert!(response.body.contains(r#""data":"pong""#));
/// # });
/// ```
pub struct App {
    config: RouterConfig,
    pipeline: Pipeline,
    dispatcher: RouteDispatcher,
}

impl App {
    /// Starts building an application from `config`.
    #[must_use]
    pub fn builder(config: RouterConfig) -> AppBuilder {
        AppBuilder::new(config)
    }

    /// Builds an application from `config` with the default in-memory store.
    #[must_use]
    pub fn from_config(config: RouterConfig) -> Self {
        Self::builder(config).build()
    }

    /// Loads configuration from `.env` and the process environment and
    /// builds the application.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the configuration is invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_config(load_config(None)?))
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Returns the middleware pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns the route dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &RouteDispatcher {
        &self.dispatcher
    }

    /// Handles one invocation.
    ///
    /// Always returns a proxy response; failures are reported through the
    /// envelope's `ResponseCode`.
    pub async fn handle(&self, event: Value, invocation: InvocationContext) -> ProxyResponse {
        let span = invocation_span(&self.config.service.origin, invocation.request_id());

        async move {
            let service = &self.config.service;
            info!(
                environment = %service.environment,
                version = %service.version,
                build = %service.build,
                "Init"
            );

            let ctx = HandlerContext::new(event, invocation);
            let response = self.pipeline.process(ctx, &self.dispatcher).await;

            info!(
                status_code = response.status_code,
                body = %response.body,
                "Response"
            );
            response
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .field("routes", &self.dispatcher.router().paths().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`App`].
#[must_use]
pub struct AppBuilder {
    config: RouterConfig,
    store: Option<Arc<dyn PersonStore>>,
    audit_sink: Option<Arc<dyn AuditSink>>,
}

impl AppBuilder {
    fn new(config: RouterConfig) -> Self {
        Self {
            config,
            store: None,
            audit_sink: None,
        }
    }

    /// Uses `store` for person storage instead of an in-memory table.
    ///
    /// The chaos settings still apply on top of it.
    pub fn with_store(mut self, store: Arc<dyn PersonStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sends audit records to `sink` instead of the log.
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Builds the application.
    #[must_use]
    pub fn build(self) -> App {
        let Self {
            config,
            store,
            audit_sink,
        } = self;

        let inner = store.unwrap_or_else(|| {
            Arc::new(MemoryPersonStore::new(config.storage.table_name.clone()))
        });
        let store: Arc<dyn PersonStore> =
            Arc::new(ChaosPersonStore::new(inner, config.chaos.clone()));

        let mut container = Container::new();
        container.provide(store);

        let mut router = Router::new();
        register_routes(&mut router);

        let mut audit = AuditLogMiddleware::new(config.service.origin.clone())
            .with_deployment(config.service.deployment())
            .with_timeout(config.service.timeout());
        if let Some(sink) = audit_sink {
            audit = audit.with_sink(sink);
        }

        App {
            pipeline: Pipeline::standard(audit),
            dispatcher: RouteDispatcher::new(Arc::new(router), Arc::new(container)),
            config,
        }
    }
}

impl std::fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppBuilder")
            .field("config", &self.config)
            .field("custom_store", &self.store.is_some())
            .field("custom_audit_sink", &self.audit_sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_registers_routes() {
        let app = App::from_config(RouterConfig::default());
        assert_eq!(
            app.dispatcher().router().paths().collect::<Vec<_>>(),
            vec!["/v1/person", "/v1/ping"]
        );
        assert_eq!(
            app.pipeline().stage_names(),
            vec!["error_classifier", "audit_log", "request_normalizer"]
        );
        assert_eq!(app.config().service.timeout_secs, 25);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[storage]\ntable_name = \"people-test\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.storage.table_name, "people-test");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/lambda-router.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
