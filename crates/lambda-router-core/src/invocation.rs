//! Per-invocation platform context.
//!
//! The [`InvocationContext`] mirrors what the serverless platform hands to a
//! function: the platform request id (used as the trace id) and a clock that
//! reports how much of the configured timeout is left.

use std::time::{Duration, Instant};

/// Platform context for a single invocation.
///
/// # Example
///
/// ```
/// use lambda_router_core::InvocationContext;
/// use std::time::Duration;
///
/// let ctx = InvocationContext::new("c6af9ac6-7b61", Duration::from_secs(3));
/// assert_eq!(ctx.request_id(), "c6af9ac6-7b61");
/// assert!(ctx.remaining_time_ms() <= 3000);
/// ```
#[derive(Debug, Clone)]
pub struct InvocationContext {
    request_id: String,
    timeout: Duration,
    deadline: Instant,
}

impl InvocationContext {
    /// Creates a context whose deadline is `timeout` from now.
    #[must_use]
    pub fn new(request_id: impl Into<String>, timeout: Duration) -> Self {
        Self::with_deadline(request_id, timeout, Instant::now() + timeout)
    }

    /// Creates a context with an explicit deadline.
    #[must_use]
    pub fn with_deadline(request_id: impl Into<String>, timeout: Duration, deadline: Instant) -> Self {
        Self {
            request_id: request_id.into(),
            timeout,
            deadline,
        }
    }

    /// Returns the platform request id.
    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Milliseconds left before the deadline, saturating at zero.
    #[must_use]
    pub fn remaining_time_ms(&self) -> u64 {
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)
    }

    /// Milliseconds consumed out of `timeout`, saturating at zero.
    #[must_use]
    pub fn elapsed_against(&self, timeout: Duration) -> u64 {
        let budget = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        budget.saturating_sub(self.remaining_time_ms())
    }
}
