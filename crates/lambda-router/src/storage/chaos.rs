//! Fault-injecting storage wrapper.

use super::{Page, Person, PersonStore, StorageError, StorageResult};
use lambda_router_config::ChaosConfig;
use lambda_router_middleware::BoxFuture;
use std::sync::Arc;
use tracing::warn;

/// Wraps a store and injects latency and failures before every call.
///
/// With `enabled` off the wrapper is transparent. Otherwise each call first
/// sleeps for `inject_latency_ms`, then fails with
/// [`StorageError::InjectedFault`] when `inject_error` is set.
pub struct ChaosPersonStore {
    inner: Arc<dyn PersonStore>,
    chaos: ChaosConfig,
}

impl ChaosPersonStore {
    /// Wraps `inner` with the given chaos settings.
    #[must_use]
    pub fn new(inner: Arc<dyn PersonStore>, chaos: ChaosConfig) -> Self {
        Self { inner, chaos }
    }

    /// Returns the chaos settings.
    #[must_use]
    pub const fn chaos(&self) -> &ChaosConfig {
        &self.chaos
    }

    async fn inject(&self, operation: &'static str) -> StorageResult<()> {
        if let Some(latency) = self.chaos.latency() {
            warn!(
                operation,
                latency_ms = self.chaos.inject_latency_ms,
                "Injecting storage latency"
            );
            tokio::time::sleep(latency).await;
        }
        if self.chaos.should_fail() {
            warn!(operation, "Injecting storage fault");
            return Err(StorageError::InjectedFault {
                table: self.inner.table_name().to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChaosPersonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaosPersonStore")
            .field("table_name", &self.inner.table_name())
            .field("chaos", &self.chaos)
            .finish_non_exhaustive()
    }
}

impl PersonStore for ChaosPersonStore {
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    fn put<'a>(&'a self, person: &'a Person) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.inject("put").await?;
            self.inner.put(person).await
        })
    }

    fn find_first(&self, limit: usize) -> BoxFuture<'_, StorageResult<Page<Person>>> {
        Box::pin(async move {
            self.inject("find_first").await?;
            self.inner.find_first(limit).await
        })
    }
}
