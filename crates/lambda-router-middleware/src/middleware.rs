//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that all pipeline stages
//! implement and the [`Dispatch`] trait for the business step the pipeline
//! wraps.
//!
//! Unlike an onion-style `next` chain, a stage never calls the stage after
//! it. The [`Pipeline`](crate::Pipeline) alone decides which phases run:
//! every `before` in registration order, then dispatch, then every `after`
//! in reverse.
//!
//! # Example
//!
//! ```
//! use lambda_router_middleware::{BoxFuture, HandlerContext, Middleware};
//! use lambda_router_core::RouterResult;
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn after<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
//!         Box::pin(async move {
//!             tracing::info!(remaining_ms = ctx.invocation().remaining_time_ms(), "Done");
//!             Ok(())
//!         })
//!     }
//! }
//! ```

use crate::context::HandlerContext;
use lambda_router_core::RouterResult;
use std::future::Future;
use std::pin::Pin;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A pipeline stage with a `before` and an `after` phase.
///
/// # Invariants
///
/// - `before` runs at most once per invocation; a failure stops the
///   remaining `before` phases and skips dispatch
/// - `after` runs exactly once for every stage whose `before` was entered,
///   even when an error is pending
/// - A failure from `after` replaces the pending error
///
/// Both phases default to doing nothing.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the unique name of this stage, used in logs.
    fn name(&self) -> &'static str;

    /// Runs before dispatch.
    fn before<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        let _ = ctx;
        Box::pin(async { Ok(()) })
    }

    /// Runs after dispatch, in reverse registration order.
    fn after<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        let _ = ctx;
        Box::pin(async { Ok(()) })
    }
}

/// The business step wrapped by the pipeline.
///
/// A dispatcher reads the normalized request from the context and, on
/// success, sets the response and stamps the audit record. Failures are
/// returned, never written to the context directly.
pub trait Dispatch: Send + Sync {
    /// Handles the normalized request.
    fn dispatch<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>>;
}

/// A dispatcher built from a synchronous closure.
///
/// # Example
///
/// ```
/// use lambda_router_middleware::{FnDispatch, HandlerContext};
/// use lambda_router_core::RouterError;
///
/// let reject = FnDispatch::new(|_ctx: &mut HandlerContext| Err(RouterError::auth("Token expired")));
/// ```
pub struct FnDispatch<F> {
    func: F,
}

impl<F> FnDispatch<F> {
    /// Creates a new function-based dispatcher.
    pub const fn new(func: F) -> Self
    where
        F: Fn(&mut HandlerContext) -> RouterResult<()> + Send + Sync,
    {
        Self { func }
    }
}

impl<F> Dispatch for FnDispatch<F>
where
    F: Fn(&mut HandlerContext) -> RouterResult<()> + Send + Sync,
{
    fn dispatch<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        Box::pin(async move { (self.func)(ctx) })
    }
}
