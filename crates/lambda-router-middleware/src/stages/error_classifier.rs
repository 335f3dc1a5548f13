//! Error classification middleware.
//!
//! Converts a pending [`RouterError`] into a coded response envelope and
//! stamps the failure onto the audit record.
//!
//! # Pipeline Position
//!
//! Registered first, so its `after` runs last and sees the final error:
//!
//! ```text
//! before: [ErrorClassifier] → AuditLog → RequestNormalizer → dispatch
//! after:  RequestNormalizer → AuditLog → [ErrorClassifier] → response
//! ```
//!
//! # Classification
//!
//! | Error | `ResponseCode` | `data` |
//! |---|---|---|
//! | `Handled` | 5001 | raw message |
//! | `Validation` | 5002 | raw message |
//! | `Auth` | 3001 | raw message |
//! | anything else | 5000 | `"Unexpected Error Occurred"` |

use crate::{
    context::HandlerContext,
    middleware::{BoxFuture, Middleware},
    pipeline::Stage,
};
use lambda_router_core::{Envelope, ProxyResponse, RouterError, RouterResult};
use std::error::Error as _;
use tracing::error;

/// Middleware that classifies a pending error into a response.
///
/// `before` does nothing. `after` passes through when no error is pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifierMiddleware;

impl ErrorClassifierMiddleware {
    /// Creates a new error classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the response for `error`.
    #[must_use]
    pub fn classify(error: &RouterError, trace_id: &str) -> ProxyResponse {
        let envelope =
            Envelope::new(error.response_code(), error.client_message()).with_trace_id(trace_id);
        ProxyResponse::from_envelope(&envelope)
    }
}

/// Joins an error's source chain into one line.
fn source_chain(error: &RouterError) -> String {
    let mut chain = Vec::new();
    let mut current = error.source();
    while let Some(source) = current {
        chain.push(source.to_string());
        current = source.source();
    }
    chain.join(": ")
}

impl Middleware for ErrorClassifierMiddleware {
    fn name(&self) -> &'static str {
        Stage::ErrorClassifier.name()
    }

    fn after<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        Box::pin(async move {
            let Some(err) = ctx.error() else {
                return Ok(());
            };

            error!(
                trace_id = ctx.trace_id(),
                category = ?err.category(),
                response_code = err.response_code().as_u16(),
                error = %err,
                cause = %source_chain(err),
                "Invocation failed"
            );

            let response = Self::classify(err, ctx.trace_id());
            ctx.stamp_failure();
            ctx.set_response(response);
            Ok(())
        })
    }
}
