//! Before/after middleware pipeline.
//!
//! The pipeline runs in three phases:
//!
//! 1. **before** - each registered stage in order is marked as started and
//!    its `before` runs. The first failure is recorded on the context and the
//!    remaining stages are neither run nor started.
//! 2. **dispatch** - runs only if no error is pending. A failure is recorded
//!    on the context.
//! 3. **after** - every started stage's `after` runs once, in reverse order,
//!    whatever the error state. A failure replaces the pending error and the
//!    remaining `after` phases still run.
//!
//! ## Standard Stages
//!
//! | Stage | Middleware         | Purpose                                      |
//! |-------|--------------------|----------------------------------------------|
//! | 1     | Error Classifier   | Turn a pending error into a coded envelope   |
//! | 2     | Audit Log          | Create and emit the audit record             |
//! | 3     | Request Normalizer | Parse the proxy event into a [`Request`]     |
//!
//! The error classifier is registered first so its `after` runs last and sees
//! the final error.
//!
//! [`Request`]: lambda_router_core::Request

use crate::context::HandlerContext;
use crate::middleware::{Dispatch, Middleware};
use crate::stages::{AuditLogMiddleware, ErrorClassifierMiddleware, RequestNormalizerMiddleware};
use lambda_router_core::ProxyResponse;
use std::sync::Arc;
use tracing::{debug, warn};

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered list of middleware stages.
///
/// # Example
///
/// ```
/// use lambda_router_middleware::pipeline::Pipeline;
/// use lambda_router_middleware::stages::AuditLogMiddleware;
///
/// let pipeline = Pipeline::standard(AuditLogMiddleware::new("LambdaMiddlewareRouter::api"));
/// assert_eq!(
///     pipeline.stage_names(),
///     vec!["error_classifier", "audit_log", "request_normalizer"]
/// );
/// ```
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Creates the standard pipeline: error classifier, audit log, request
    /// normalizer.
    #[must_use]
    pub fn standard(audit: AuditLogMiddleware) -> Self {
        let audit: BoxedMiddleware = Arc::new(audit);
        let stages = Stage::all()
            .into_iter()
            .map(|stage| -> BoxedMiddleware {
                match stage {
                    Stage::ErrorClassifier => Arc::new(ErrorClassifierMiddleware::new()),
                    Stage::AuditLog => Arc::clone(&audit),
                    Stage::RequestNormalizer => Arc::new(RequestNormalizerMiddleware::new()),
                }
            })
            .collect();

        Self { stages }
    }

    /// Runs all three phases against `ctx`.
    ///
    /// Errors never escape: they are left on the context for the stages'
    /// `after` phases and the caller to inspect.
    pub async fn run(&self, ctx: &mut HandlerContext, dispatcher: &dyn Dispatch) {
        let mut started: Vec<&BoxedMiddleware> = Vec::with_capacity(self.stages.len());

        for middleware in &self.stages {
            started.push(middleware);
            debug!(stage = middleware.name(), phase = "before", "Entering stage");

            if let Err(error) = middleware.before(ctx).await {
                warn!(
                    stage = middleware.name(),
                    phase = "before",
                    error = %error,
                    "Stage failed, skipping remaining stages"
                );
                ctx.set_error(error);
                break;
            }
        }

        if ctx.has_error() {
            debug!(phase = "dispatch", "Skipping dispatch, error pending");
        } else {
            debug!(phase = "dispatch", "Dispatching");
            if let Err(error) = dispatcher.dispatch(ctx).await {
                warn!(phase = "dispatch", error = %error, "Dispatch failed");
                ctx.set_error(error);
            }
        }

        for middleware in started.into_iter().rev() {
            debug!(stage = middleware.name(), phase = "after", "Entering stage");

            if let Err(error) = middleware.after(ctx).await {
                warn!(
                    stage = middleware.name(),
                    phase = "after",
                    error = %error,
                    "Stage failed, replacing pending error"
                );
                ctx.set_error(error);
            }
        }
    }

    /// Runs the pipeline and returns the response it produced.
    ///
    /// If no stage produced a response, the generic unexpected-error
    /// envelope is returned instead.
    pub async fn process(&self, mut ctx: HandlerContext, dispatcher: &dyn Dispatch) -> ProxyResponse {
        self.run(&mut ctx, dispatcher).await;

        match ctx.take_response() {
            Some(response) => response,
            None => {
                warn!(
                    trace_id = ctx.trace_id(),
                    "Pipeline produced no response, returning generic error"
                );
                ProxyResponse::unexpected(ctx.trace_id())
            }
        }
    }

    /// Returns the names of all middleware stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of middleware stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty pipeline builder.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends a stage. `before` phases run in the order stages are added.
    #[must_use]
    pub fn stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends a shared stage.
    #[must_use]
    pub fn shared_stage(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

/// The standard stages, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: error classification (first `before`, last `after`)
    ErrorClassifier = 1,
    /// Stage 2: audit record lifecycle
    AuditLog = 2,
    /// Stage 3: request normalization
    RequestNormalizer = 3,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ErrorClassifier => "error_classifier",
            Self::AuditLog => "audit_log",
            Self::RequestNormalizer => "request_normalizer",
        }
    }

    /// Returns all stages in registration order.
    #[must_use]
    pub const fn all() -> [Stage; 3] {
        [Self::ErrorClassifier, Self::AuditLog, Self::RequestNormalizer]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{BoxFuture, FnDispatch};
    use lambda_router_core::{
        Envelope, InvocationContext, ResponseCode, RouterError, RouterResult,
    };
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;

    type Log = Arc<Mutex<Vec<String>>>;

    /// A test middleware that records its phases and can be told to fail.
    struct OrderTrackingMiddleware {
        name: &'static str,
        log: Log,
        fail_before: bool,
        fail_after: bool,
    }

    impl OrderTrackingMiddleware {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: log.clone(),
                fail_before: false,
                fail_after: false,
            }
        }

        fn failing_before(mut self) -> Self {
            self.fail_before = true;
            self
        }

        fn failing_after(mut self) -> Self {
            self.fail_after = true;
            self
        }
    }

    impl Middleware for OrderTrackingMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn before<'a>(&'a self, _ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
            Box::pin(async move {
                self.log.lock().push(format!("before:{}", self.name));
                if self.fail_before {
                    return Err(RouterError::validation(format!("{} rejected", self.name)));
                }
                Ok(())
            })
        }

        fn after<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
            Box::pin(async move {
                let seen = ctx.error().map_or("none".to_string(), |e| e.message().to_string());
                self.log
                    .lock()
                    .push(format!("after:{}:{}", self.name, seen));
                if self.fail_after {
                    return Err(RouterError::unclassified(format!("{} broke", self.name)));
                }
                Ok(())
            })
        }
    }

    fn context() -> HandlerContext {
        HandlerContext::new(
            json!({}),
            InvocationContext::new("trace-1", Duration::from_secs(3)),
        )
    }

    fn recording_dispatch(log: &Log) -> impl Dispatch + '_ {
        FnDispatch::new(move |ctx: &mut HandlerContext| {
            log.lock().push("dispatch".to_string());
            ctx.set_response(ProxyResponse::from_envelope(&Envelope::new(
                ResponseCode::Success,
                "ok",
            )));
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_pipeline_executes_in_order() {
        let log: Log = Arc::default();
        let pipeline = Pipeline::builder()
            .stage(OrderTrackingMiddleware::new("first", &log))
            .stage(OrderTrackingMiddleware::new("second", &log))
            .stage(OrderTrackingMiddleware::new("third", &log))
            .build();

        let mut ctx = context();
        pipeline.run(&mut ctx, &recording_dispatch(&log)).await;

        assert!(!ctx.has_error());
        assert_eq!(
            *log.lock(),
            vec![
                "before:first",
                "before:second",
                "before:third",
                "dispatch",
                "after:third:none",
                "after:second:none",
                "after:first:none",
            ]
        );
    }

    #[tokio::test]
    async fn test_before_failure_skips_rest_and_unwinds_started() {
        let log: Log = Arc::default();
        let pipeline = Pipeline::builder()
            .stage(OrderTrackingMiddleware::new("first", &log))
            .stage(OrderTrackingMiddleware::new("second", &log).failing_before())
            .stage(OrderTrackingMiddleware::new("third", &log))
            .build();

        let mut ctx = context();
        pipeline.run(&mut ctx, &recording_dispatch(&log)).await;

        assert_eq!(ctx.error().unwrap().message(), "second rejected");
        assert_eq!(
            *log.lock(),
            vec![
                "before:first",
                "before:second",
                "after:second:second rejected",
                "after:first:second rejected",
            ]
        );
    }

    #[tokio::test]
    async fn test_first_stage_failure_still_runs_its_after() {
        let log: Log = Arc::default();
        let pipeline = Pipeline::builder()
            .stage(OrderTrackingMiddleware::new("only", &log).failing_before())
            .stage(OrderTrackingMiddleware::new("never", &log))
            .build();

        let mut ctx = context();
        pipeline.run(&mut ctx, &recording_dispatch(&log)).await;

        assert_eq!(*log.lock(), vec!["before:only", "after:only:only rejected"]);
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_captured() {
        let log: Log = Arc::default();
        let pipeline = Pipeline::builder()
            .stage(OrderTrackingMiddleware::new("first", &log))
            .build();

        let dispatch = FnDispatch::new(|_ctx: &mut HandlerContext| {
            Err(RouterError::handled("out of stock"))
        });

        let mut ctx = context();
        pipeline.run(&mut ctx, &dispatch).await;

        assert_eq!(ctx.error().unwrap().message(), "out of stock");
        assert_eq!(*log.lock(), vec!["before:first", "after:first:out of stock"]);
    }

    #[tokio::test]
    async fn test_after_failure_overwrites_error_and_continues() {
        let log: Log = Arc::default();
        let pipeline = Pipeline::builder()
            .stage(OrderTrackingMiddleware::new("outer", &log))
            .stage(OrderTrackingMiddleware::new("inner", &log).failing_after())
            .build();

        let mut ctx = context();
        pipeline.run(&mut ctx, &recording_dispatch(&log)).await;

        assert_eq!(ctx.error().unwrap().message(), "inner broke");
        assert_eq!(
            *log.lock(),
            vec![
                "before:outer",
                "before:inner",
                "dispatch",
                "after:inner:none",
                "after:outer:inner broke",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_pipeline_dispatches() {
        let log: Log = Arc::default();
        let pipeline = Pipeline::builder().build();

        let response = pipeline.process(context(), &recording_dispatch(&log)).await;

        assert_eq!(*log.lock(), vec!["dispatch"]);
        let envelope = response.envelope().unwrap();
        assert_eq!(envelope.response_code(), Some(ResponseCode::Success));
    }

    #[tokio::test]
    async fn test_process_without_response_falls_back() {
        let pipeline = Pipeline::builder().build();
        let dispatch = FnDispatch::new(|_ctx: &mut HandlerContext| {
            Err(RouterError::unclassified("no classifier registered"))
        });

        let response = pipeline.process(context(), &dispatch).await;
        let envelope = response.envelope().unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(envelope.response_code(), Some(ResponseCode::Unexpected));
        assert_eq!(envelope.data, "Unexpected Error Occurred");
        assert_eq!(envelope.trace_id(), Some("trace-1"));
    }

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::ErrorClassifier < Stage::AuditLog);
        assert!(Stage::AuditLog < Stage::RequestNormalizer);
    }

    #[test]
    fn test_standard_pipeline_matches_stages() {
        let pipeline = Pipeline::standard(AuditLogMiddleware::new("test::api"));
        let expected: Vec<&str> = Stage::all().iter().map(|s| s.name()).collect();
        assert_eq!(pipeline.stage_names(), expected);
        assert_eq!(pipeline.stage_count(), 3);
    }
}
