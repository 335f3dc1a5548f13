//! Lambda-style invocation context for tests.

use lambda_router_core::InvocationContext;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Builds [`InvocationContext`]s the way the platform would.
///
/// # Example
///
/// ```
/// use lambda_router_test::TestInvocation;
///
/// let ctx = TestInvocation::new(3).request_id("req-1").build();
/// assert_eq!(ctx.request_id(), "req-1");
/// assert!(ctx.remaining_time_ms() <= 3000);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct TestInvocation {
    request_id: String,
    timeout: Duration,
    memory_limit_mb: u32,
    elapsed: Duration,
}

impl TestInvocation {
    /// Creates an invocation with a fresh request id and the given timeout.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            timeout: Duration::from_secs(timeout_secs),
            memory_limit_mb: 1024,
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the request id.
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Sets the memory limit.
    pub fn memory_limit_mb(mut self, memory_limit_mb: u32) -> Self {
        self.memory_limit_mb = memory_limit_mb;
        self
    }

    /// Pretends `elapsed` of the timeout was already used when the
    /// invocation starts.
    pub fn already_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Returns the memory limit.
    #[must_use]
    pub fn memory_limit(&self) -> u32 {
        self.memory_limit_mb
    }

    /// Builds the context. The deadline starts counting now.
    #[must_use]
    pub fn build(self) -> InvocationContext {
        let remaining = self.timeout.saturating_sub(self.elapsed);
        InvocationContext::with_deadline(self.request_id, self.timeout, Instant::now() + remaining)
    }
}

impl Default for TestInvocation {
    fn default() -> Self {
        Self::new(25)
    }
}
