//! Route registry.
//!
//! The [`Router`] maps registered paths to resource factories. Lookup tries
//! an exact match first, then the longest registered prefix that ends on a
//! `/` boundary, so `/v1/person` also serves `/v1/person/42`.

use crate::resource::Resource;
use lambda_router_core::{di::Container, RouterError, RouterResult};
use lambda_router_middleware::stages::normalize_path;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds a resource from the process-wide service container.
pub type HandlerFactory = Arc<dyn Fn(&Container) -> RouterResult<Arc<dyn Resource>> + Send + Sync>;

/// A resolved route.
#[derive(Clone)]
pub struct RouteMatch<'a> {
    /// The registered path that matched.
    pub pattern: &'a str,
    /// Path left over after the matched prefix, without the leading `/`.
    pub remainder: &'a str,
    /// Factory for the matched resource.
    pub factory: &'a HandlerFactory,
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("remainder", &self.remainder)
            .finish_non_exhaustive()
    }
}

/// Explicit path → resource registry, populated at startup.
///
/// # Example
///
/// ```
/// use lambda_router_dispatch::{MethodReturn, Resource, Router};
/// use lambda_router_core::{AuditRecord, Request, RouterResult};
/// use lambda_router_middleware::BoxFuture;
/// use std::sync::Arc;
///
/// struct Ping;
///
/// impl Resource for Ping {
///     fn get<'a>(
///         &'a self,
///         _request: &'a Request,
///         _audit: &'a AuditRecord,
///     ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
///         Box::pin(async { Ok(MethodReturn::new("pong")) })
///     }
/// }
///
/// let mut router = Router::new();
/// router.insert_shared("/v1/ping", Arc::new(Ping));
///
/// assert!(router.match_route("/v1/ping").is_some());
/// assert!(router.match_route("/v1/pingx").is_none());
/// ```
#[derive(Clone, Default)]
pub struct Router {
    routes: BTreeMap<String, HandlerFactory>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for `path`. A later registration for the same
    /// path replaces the earlier one.
    pub fn insert<F>(&mut self, path: &str, factory: F)
    where
        F: Fn(&Container) -> RouterResult<Arc<dyn Resource>> + Send + Sync + 'static,
    {
        self.routes.insert(normalize_path(path), Arc::new(factory));
    }

    /// Registers one resource instance shared by every invocation.
    pub fn insert_shared(&mut self, path: &str, resource: Arc<dyn Resource>) {
        self.insert(path, move |_: &Container| Ok(Arc::clone(&resource)));
    }

    /// Finds the route for `path`.
    #[must_use]
    pub fn match_route<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        if let Some((pattern, factory)) = self.routes.get_key_value(path) {
            return Some(RouteMatch {
                pattern,
                remainder: "",
                factory,
            });
        }

        self.routes
            .iter()
            .filter_map(|(pattern, factory)| {
                let rest = path.strip_prefix(pattern.as_str())?;
                let remainder = if pattern == "/" {
                    rest
                } else {
                    rest.strip_prefix('/')?
                };
                Some(RouteMatch {
                    pattern,
                    remainder,
                    factory,
                })
            })
            .max_by_key(|m| m.pattern.len())
    }

    /// Resolves and builds the resource for `path`.
    ///
    /// # Errors
    ///
    /// Returns an unclassified error when no route matches or the factory
    /// fails.
    pub fn resolve(&self, path: &str, container: &Container) -> RouterResult<Arc<dyn Resource>> {
        let route = self
            .match_route(path)
            .ok_or_else(|| RouterError::unclassified(format!("no route registered for {path}")))?;
        tracing::debug!(pattern = route.pattern, path, "Resolved route");
        (route.factory)(container)
    }

    /// Returns the registered paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}
