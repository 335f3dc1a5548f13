//! Handler context for the middleware pipeline.
//!
//! The [`HandlerContext`] carries all per-invocation state through the
//! middleware stages and into the route dispatcher.

use lambda_router_core::{
    AuditRecord, InvocationContext, ProxyResponse, Request, RouterError, RouterResult,
};
use serde_json::Value;

/// Mutable state threaded through one invocation.
///
/// The context is created from the raw platform event and the invocation
/// context, then enriched stage by stage:
///
/// - the audit stage fills in the [`AuditRecord`]
/// - the request normalizer fills in the [`Request`]
/// - the dispatcher or the error classifier fills in the response
///
/// Once [`error`](Self::error) is set, the pipeline stops running `before`
/// phases and skips dispatch.
///
/// # Example
///
/// ```
/// use lambda_router_middleware::HandlerContext;
/// use lambda_router_core::InvocationContext;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let ctx = HandlerContext::new(
///     json!({"httpMethod": "GET", "path": "/v1/ping"}),
///     InvocationContext::new("req-1", Duration::from_secs(3)),
/// );
///
/// assert_eq!(ctx.trace_id(), "req-1");
/// assert!(ctx.request().is_none());
/// assert!(!ctx.has_error());
/// ```
#[derive(Debug)]
pub struct HandlerContext {
    event: Value,
    invocation: InvocationContext,
    trace_id: String,
    request: Option<Request>,
    response: Option<ProxyResponse>,
    audit_record: Option<AuditRecord>,
    error: Option<RouterError>,
}

impl HandlerContext {
    /// Creates a context whose trace id is the platform request id.
    #[must_use]
    pub fn new(event: Value, invocation: InvocationContext) -> Self {
        let trace_id = invocation.request_id().to_string();
        Self {
            event,
            invocation,
            trace_id,
            request: None,
            response: None,
            audit_record: None,
            error: None,
        }
    }

    /// Returns the raw platform event.
    #[must_use]
    pub const fn event(&self) -> &Value {
        &self.event
    }

    /// Returns the invocation context.
    #[must_use]
    pub const fn invocation(&self) -> &InvocationContext {
        &self.invocation
    }

    /// Returns the trace id.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Overrides the trace id.
    pub fn set_trace_id(&mut self, trace_id: impl Into<String>) {
        self.trace_id = trace_id.into();
    }

    /// Returns the normalized request, once the normalizer ran.
    #[must_use]
    pub const fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// Returns the normalized request or an unclassified error.
    pub fn require_request(&self) -> RouterResult<&Request> {
        self.request
            .as_ref()
            .ok_or_else(|| RouterError::unclassified("request has not been normalized"))
    }

    /// Sets the normalized request.
    pub fn set_request(&mut self, request: Request) {
        self.request = Some(request);
    }

    /// Returns the response built so far.
    #[must_use]
    pub const fn response(&self) -> Option<&ProxyResponse> {
        self.response.as_ref()
    }

    /// Sets the response.
    pub fn set_response(&mut self, response: ProxyResponse) {
        self.response = Some(response);
    }

    /// Takes the response out of the context.
    pub fn take_response(&mut self) -> Option<ProxyResponse> {
        self.response.take()
    }

    /// Returns the audit record, once the audit stage ran.
    #[must_use]
    pub const fn audit_record(&self) -> Option<&AuditRecord> {
        self.audit_record.as_ref()
    }

    /// Returns the audit record mutably.
    pub fn audit_record_mut(&mut self) -> Option<&mut AuditRecord> {
        self.audit_record.as_mut()
    }

    /// Returns the audit record mutably or an unclassified error.
    pub fn require_audit_record_mut(&mut self) -> RouterResult<&mut AuditRecord> {
        self.audit_record
            .as_mut()
            .ok_or_else(|| RouterError::unclassified("audit record has not been created"))
    }

    /// Replaces the audit record.
    pub fn set_audit_record(&mut self, record: AuditRecord) {
        self.audit_record = Some(record);
    }

    /// Returns the pending error.
    #[must_use]
    pub const fn error(&self) -> Option<&RouterError> {
        self.error.as_ref()
    }

    /// Returns `true` if an error is pending.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Records an error, replacing any previous one.
    pub fn set_error(&mut self, error: RouterError) {
        self.error = Some(error);
    }

    /// Takes the pending error out of the context.
    pub fn take_error(&mut self) -> Option<RouterError> {
        self.error.take()
    }

    /// Stamps the pending error onto the audit record.
    ///
    /// Returns `false` when there is no error or no record, or when the
    /// record already carries this error's failure code.
    pub fn stamp_failure(&mut self) -> bool {
        match (self.audit_record.as_mut(), self.error.as_ref()) {
            (Some(record), Some(error)) => {
                let code = error.response_code().as_u16();
                if record.status == Some(false) && record.status_code == Some(code) {
                    return false;
                }
                record.record_failure(error);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_router_core::DeploymentInfo;
    use serde_json::json;
    use std::time::Duration;

    fn context() -> HandlerContext {
        HandlerContext::new(
            json!({}),
            InvocationContext::new("trace-abc", Duration::from_secs(3)),
        )
    }

    #[test]
    fn test_new_context() {
        let ctx = context();
        assert_eq!(ctx.trace_id(), "trace-abc");
        assert_eq!(ctx.invocation().request_id(), "trace-abc");
        assert!(ctx.response().is_none());
        assert!(ctx.audit_record().is_none());
        assert!(ctx.error().is_none());
    }

    #[test]
    fn test_require_missing_parts() {
        let mut ctx = context();
        assert!(ctx.require_request().is_err());
        assert!(ctx.require_audit_record_mut().is_err());
    }

    #[test]
    fn test_error_replacement() {
        let mut ctx = context();
        ctx.set_error(RouterError::validation("first"));
        ctx.set_error(RouterError::auth("second"));
        assert_eq!(ctx.error().unwrap().message(), "second");
        assert!(ctx.take_error().is_some());
        assert!(!ctx.has_error());
    }

    #[test]
    fn test_stamp_failure() {
        let mut ctx = context();
        assert!(!ctx.stamp_failure());

        ctx.set_audit_record(AuditRecord::start("trace-abc", "o", &DeploymentInfo::default()));
        assert!(!ctx.stamp_failure());

        ctx.set_error(RouterError::handled("duplicate"));
        assert!(ctx.stamp_failure());

        let record = ctx.audit_record().unwrap();
        assert_eq!(record.status_code, Some(5001));
        assert_eq!(record.status, Some(false));
    }

    #[test]
    fn test_stamp_failure_writes_once_per_code() {
        let mut ctx = context();
        ctx.set_audit_record(AuditRecord::start("trace-abc", "o", &DeploymentInfo::default()));
        ctx.set_error(RouterError::validation("name is required"));
        assert!(ctx.stamp_failure());

        ctx.audit_record_mut().unwrap().status_description = Some("first".to_string());
        assert!(!ctx.stamp_failure());
        assert_eq!(
            ctx.audit_record().unwrap().status_description.as_deref(),
            Some("first")
        );

        ctx.set_error(RouterError::unclassified("after phase broke"));
        assert!(ctx.stamp_failure());
        let record = ctx.audit_record().unwrap();
        assert_eq!(record.status_code, Some(5000));
        assert_eq!(record.status_description.as_deref(), Some("after phase broke"));
    }
}
