//! Dependency injection container.
//!
//! Process-wide handles (storage clients, SDK clients, configuration) are
//! registered once when the application starts and resolved by type whenever a
//! route handler is constructed for an invocation.
//!
//! # Example
//!
//! ```rust
//! use lambda_router_core::di::Container;
//! use std::sync::Arc;
//!
//! struct TableName(String);
//!
//! let mut container = Container::new();
//! container.register(Arc::new(TableName("people".to_string())));
//!
//! let table: Arc<TableName> = container.resolve_required().unwrap();
//! assert_eq!(table.0, "people");
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error when a dependency cannot be resolved.
#[derive(Debug, Clone, Error)]
#[error("Failed to inject {type_name}: {reason}")]
pub struct InjectionError {
    /// The type name that could not be resolved.
    pub type_name: &'static str,
    /// The reason for the failure.
    pub reason: String,
}

impl InjectionError {
    /// Creates a new injection error for a missing service.
    pub fn not_registered<T: ?Sized>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            reason: "service not registered".to_string(),
        }
    }
}

/// A dependency injection container.
///
/// Services are stored as `Arc`s keyed by their type. The container is
/// `Send + Sync` and is shared read-only across invocations once built.
/// Trait objects go through [`provide`](Self::provide) and
/// [`inject`](Self::inject), which wrap them in an outer `Arc`.
#[derive(Default)]
pub struct Container {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Registers a service, replacing any previous service of the same type.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    /// Resolves a service from the container.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| s.clone().downcast::<T>().ok())
    }

    /// Resolves a service or returns an error.
    pub fn resolve_required<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.resolve().ok_or_else(InjectionError::not_registered::<T>)
    }

    /// Registers a shared handle, typically a trait object such as
    /// `Arc<dyn PersonStore>`. Resolve it with [`inject`](Self::inject).
    pub fn provide<T: ?Sized + Send + Sync + 'static>(&mut self, handle: Arc<T>) {
        self.register(Arc::new(handle));
    }

    /// Resolves a handle registered with [`provide`](Self::provide).
    pub fn inject<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.resolve_required::<Arc<T>>()
            .map(|handle| Arc::clone(&*handle))
    }

    /// Checks if a service is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("service_count", &self.services.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut container = Container::new();
        container.register(Arc::new(42_u32));

        assert!(container.contains::<u32>());
        assert_eq!(*container.resolve::<u32>().unwrap(), 42);
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_resolve_missing() {
        let container = Container::new();
        assert!(container.is_empty());
        let err = container.resolve_required::<String>().unwrap_err();
        assert!(err.to_string().contains("service not registered"));
        assert!(err.type_name.contains("String"));
    }

    #[test]
    fn test_trait_object_service() {
        let mut container = Container::new();
        let greeter: Arc<dyn Greeter> = Arc::new(English);
        container.register(Arc::new(greeter));

        let resolved = container.resolve_required::<Arc<dyn Greeter>>().unwrap();
        assert_eq!(resolved.greet(), "hello");
    }

    #[test]
    fn test_provide_and_inject() {
        let mut container = Container::new();
        container.provide::<dyn Greeter>(Arc::new(English));

        assert!(container.contains::<Arc<dyn Greeter>>());
        assert_eq!(container.inject::<dyn Greeter>().unwrap().greet(), "hello");
        assert!(Container::new().inject::<dyn Greeter>().is_err());
    }

    #[test]
    fn test_register_replaces() {
        let mut container = Container::new();
        container.register(Arc::new("a".to_string()));
        container.register(Arc::new("b".to_string()));
        assert_eq!(container.len(), 1);
        assert_eq!(container.resolve::<String>().unwrap().as_str(), "b");
    }
}
