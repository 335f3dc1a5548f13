//! Audit log middleware.
//!
//! Creates one [`AuditRecord`] per invocation in `before` and emits it in
//! `after`, once `run_time` and the outcome are known.
//!
//! # Pipeline Position
//!
//! Audit runs second, so its `after` runs before the error classifier's. When
//! an error is pending, `after` stamps the failure outcome itself so the
//! emitted record already carries the final `status_code`.
//!
//! # Example
//!
//! ```
//! use lambda_router_middleware::stages::{AuditLogMiddleware, MemoryAuditSink};
//! use lambda_router_core::DeploymentInfo;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let sink = Arc::new(MemoryAuditSink::new());
//! let audit = AuditLogMiddleware::new("LambdaMiddlewareRouter::api")
//!     .with_deployment(DeploymentInfo {
//!         environment: "prod".to_string(),
//!         version: "1.0.0".to_string(),
//!         build: "1".to_string(),
//!     })
//!     .with_timeout(Duration::from_secs(25))
//!     .with_sink(sink.clone());
//! ```

use crate::{
    context::HandlerContext,
    middleware::{BoxFuture, Middleware},
    pipeline::Stage,
};
use lambda_router_core::{AuditRecord, DeploymentInfo, RouterResult};
use lambda_router_telemetry::targets;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Destination for finalized audit records.
pub trait AuditSink: Send + Sync + 'static {
    /// Emits a finalized record. Called once per invocation.
    fn emit(&self, record: &AuditRecord);
}

/// Emits audit records as structured `tracing` events on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, record: &AuditRecord) {
        match serde_json::to_string(record) {
            Ok(json) => info!(
                target: targets::AUDIT,
                trace_id = %record.trace_id,
                status_code = record.status_code,
                run_time_ms = record.run_time,
                record = %json,
                "Audit"
            ),
            Err(e) => warn!(
                trace_id = %record.trace_id,
                error = %e,
                "Failed to serialize audit record"
            ),
        }
    }
}

/// Keeps emitted records in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record emitted so far.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Returns the most recent record.
    #[must_use]
    pub fn last(&self) -> Option<AuditRecord> {
        self.records.lock().last().cloned()
    }

    /// Returns the number of emitted records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl AuditSink for MemoryAuditSink {
    fn emit(&self, record: &AuditRecord) {
        self.records.lock().push(record.clone());
    }
}

/// Audit log middleware.
#[derive(Clone)]
pub struct AuditLogMiddleware {
    /// Logical service name stamped as `origin`.
    origin: String,
    /// Environment, version and build stamps.
    deployment: DeploymentInfo,
    /// Configured function timeout, the base for `run_time`.
    timeout: Duration,
    /// Where finalized records go.
    sink: Arc<dyn AuditSink>,
}

impl AuditLogMiddleware {
    /// Creates an audit stage for `origin` that logs through `tracing`.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            deployment: DeploymentInfo::default(),
            timeout: Duration::from_secs(25),
            sink: Arc::new(TracingAuditSink),
        }
    }

    /// Sets the deployment stamps.
    #[must_use]
    pub fn with_deployment(mut self, deployment: DeploymentInfo) -> Self {
        self.deployment = deployment;
        self
    }

    /// Sets the function timeout used to compute `run_time`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the sink records are emitted to.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the origin.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl std::fmt::Debug for AuditLogMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogMiddleware")
            .field("origin", &self.origin)
            .field("deployment", &self.deployment)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Middleware for AuditLogMiddleware {
    fn name(&self) -> &'static str {
        Stage::AuditLog.name()
    }

    fn before<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        Box::pin(async move {
            let record = AuditRecord::start(ctx.trace_id(), &self.origin, &self.deployment);
            ctx.set_audit_record(record);
            Ok(())
        })
    }

    fn after<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        Box::pin(async move {
            let run_time = ctx.invocation().elapsed_against(self.timeout);

            // The classifier's after runs later; stamp now so the record is final.
            ctx.stamp_failure();

            let record = ctx.require_audit_record_mut()?;
            record.run_time = Some(run_time);
            self.sink.emit(record);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_router_core::{InvocationContext, RouterError};
    use serde_json::json;

    fn context(timeout: Duration) -> HandlerContext {
        HandlerContext::new(json!({}), InvocationContext::new("trace-a", timeout))
    }

    fn audit(sink: &Arc<MemoryAuditSink>) -> AuditLogMiddleware {
        AuditLogMiddleware::new("LambdaMiddlewareRouter::api")
            .with_deployment(DeploymentInfo {
                environment: "test".to_string(),
                version: "1.0.0".to_string(),
                build: "7".to_string(),
            })
            .with_timeout(Duration::from_secs(3))
            .with_sink(sink.clone())
    }

    #[test]
    fn test_middleware_name() {
        assert_eq!(AuditLogMiddleware::new("o").name(), "audit_log");
        assert_eq!(AuditLogMiddleware::new("o").origin(), "o");
    }

    #[tokio::test]
    async fn test_before_creates_record() {
        let sink = Arc::new(MemoryAuditSink::new());
        let mut ctx = context(Duration::from_secs(3));
        audit(&sink).before(&mut ctx).await.unwrap();

        let record = ctx.audit_record().unwrap();
        assert_eq!(record.trace_id, "trace-a");
        assert_eq!(record.origin, "LambdaMiddlewareRouter::api");
        assert_eq!(record.record_type, "api");
        assert_eq!(record.environment, "test");
        assert_eq!(record.build, "7");
        assert!(record.status.is_none());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_after_emits_once_with_run_time() {
        let sink = Arc::new(MemoryAuditSink::new());
        let mw = audit(&sink);
        let mut ctx = context(Duration::from_secs(3));

        mw.before(&mut ctx).await.unwrap();
        ctx.audit_record_mut().unwrap().record_success();
        mw.after(&mut ctx).await.unwrap();

        assert_eq!(sink.len(), 1);
        let record = sink.last().unwrap();
        assert_eq!(record.status_code, Some(2000));
        assert!(record.run_time.unwrap() < 3000);
    }

    #[tokio::test]
    async fn test_after_stamps_pending_error() {
        let sink = Arc::new(MemoryAuditSink::new());
        let mw = audit(&sink);
        let mut ctx = context(Duration::from_secs(3));

        mw.before(&mut ctx).await.unwrap();
        ctx.set_error(RouterError::validation("Field: limit is required"));
        mw.after(&mut ctx).await.unwrap();

        let record = sink.last().unwrap();
        assert_eq!(record.status, Some(false));
        assert_eq!(record.status_code, Some(5002));
        assert!(record.raise_alarm);
    }

    #[tokio::test]
    async fn test_pending_error_overrides_success() {
        let sink = Arc::new(MemoryAuditSink::new());
        let mw = audit(&sink);
        let mut ctx = context(Duration::from_secs(3));

        mw.before(&mut ctx).await.unwrap();
        ctx.audit_record_mut().unwrap().record_success();
        ctx.set_error(RouterError::unclassified("late failure"));
        mw.after(&mut ctx).await.unwrap();

        assert_eq!(sink.last().unwrap().status_code, Some(5000));
    }

    #[tokio::test]
    async fn test_after_without_record_fails() {
        let sink = Arc::new(MemoryAuditSink::new());
        let mut ctx = context(Duration::from_secs(3));

        let result = audit(&sink).after(&mut ctx).await;
        assert!(result.is_err());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_run_time_uses_configured_timeout() {
        let sink = Arc::new(MemoryAuditSink::new());
        let mw = audit(&sink).with_timeout(Duration::from_secs(10));
        let mut ctx = context(Duration::from_secs(3));

        mw.before(&mut ctx).await.unwrap();
        mw.after(&mut ctx).await.unwrap();

        // Platform deadline is 3s away while the configured timeout is 10s.
        let run_time = sink.last().unwrap().run_time.unwrap();
        assert!(run_time >= 7000);
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        let record = AuditRecord::start("t", "o", &DeploymentInfo::default());
        TracingAuditSink.emit(&record);
    }
}
