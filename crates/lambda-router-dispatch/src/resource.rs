//! Business resources.
//!
//! A [`Resource`] owns the handlers for one registered path. Each HTTP verb
//! maps to one method; verbs a resource does not override fail with an
//! unclassified error.

use http::Method;
use lambda_router_core::{AuditRecord, Request, RouterError, RouterResult};
use lambda_router_middleware::BoxFuture;
use serde_json::{Map, Value};

/// What a resource method hands back to the dispatcher.
///
/// `body` becomes the envelope's `data`. `control` entries are merged into
/// the envelope's `control` (`TraceID` is always overwritten). When
/// `audit_record` is set it replaces the invocation's audit record before
/// the success outcome is stamped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodReturn {
    /// Response payload.
    pub body: Value,
    /// Extra control fields.
    pub control: Option<Map<String, Value>>,
    /// Audit record override.
    pub audit_record: Option<AuditRecord>,
}

impl MethodReturn {
    /// Creates a return value with only a body.
    #[must_use]
    pub fn new(body: impl Into<Value>) -> Self {
        Self {
            body: body.into(),
            control: None,
            audit_record: None,
        }
    }

    /// Adds extra control fields.
    #[must_use]
    pub fn with_control(mut self, control: Map<String, Value>) -> Self {
        self.control = Some(control);
        self
    }

    /// Replaces the invocation's audit record.
    #[must_use]
    pub fn with_audit_record(mut self, record: AuditRecord) -> Self {
        self.audit_record = Some(record);
        self
    }
}

/// Builds the error returned for a verb a resource does not handle.
#[must_use]
pub fn method_not_supported(method: &Method) -> RouterError {
    RouterError::unclassified(format!("method {method} is not supported"))
}

/// Handlers for one registered path.
///
/// Every method receives the normalized request and a snapshot of the
/// invocation's audit record.
///
/// # Example
///
/// ```
/// use lambda_router_dispatch::{MethodReturn, Resource};
/// use lambda_router_core::{AuditRecord, Request, RouterResult};
/// use lambda_router_middleware::BoxFuture;
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
/// ```
pub trait Resource: Send + Sync {
    /// Handles `GET`.
    fn get<'a>(
        &'a self,
        request: &'a Request,
        audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        let _ = (request, audit);
        Box::pin(async { Err(method_not_supported(&Method::GET)) })
    }

    /// Handles `POST`.
    fn post<'a>(
        &'a self,
        request: &'a Request,
        audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        let _ = (request, audit);
        Box::pin(async { Err(method_not_supported(&Method::POST)) })
    }

    /// Handles `PUT`.
    fn put<'a>(
        &'a self,
        request: &'a Request,
        audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        let _ = (request, audit);
        Box::pin(async { Err(method_not_supported(&Method::PUT)) })
    }

    /// Handles `PATCH`.
    fn patch<'a>(
        &'a self,
        request: &'a Request,
        audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        let _ = (request, audit);
        Box::pin(async { Err(method_not_supported(&Method::PATCH)) })
    }

    /// Handles `DELETE`.
    fn delete<'a>(
        &'a self,
        request: &'a Request,
        audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        let _ = (request, audit);
        Box::pin(async { Err(method_not_supported(&Method::DELETE)) })
    }
}

/// Calls the method of `resource` that matches `request.method()`.
pub fn invoke<'a>(
    resource: &'a dyn Resource,
    request: &'a Request,
    audit: &'a AuditRecord,
) -> BoxFuture<'a, RouterResult<MethodReturn>> {
    match request.method().as_str() {
        "GET" => resource.get(request, audit),
        "POST" => resource.post(request, audit),
        "PUT" => resource.put(request, audit),
        "PATCH" => resource.patch(request, audit),
        "DELETE" => resource.delete(request, audit),
        _ => {
            let err = method_not_supported(request.method());
            Box::pin(async move { Err(err) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_router_core::DeploymentInfo;
    use serde_json::json;

    struct Echo;

    impl Resource for Echo {
        fn post<'a>(
            &'a self,
            request: &'a Request,
            _audit: &'a AuditRecord,
        ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
            Box::pin(async move { Ok(MethodReturn::new(request.body().clone())) })
        }
    }

    fn record() -> AuditRecord {
        AuditRecord::start("t", "o", &DeploymentInfo::default())
    }

    #[tokio::test]
    async fn test_invoke_matching_verb() {
        let request = Request::new(Method::POST, "/echo").with_body(json!({"a": 1}));
        let result = invoke(&Echo, &request, &record()).await.unwrap();
        assert_eq!(result.body, json!({"a": 1}));
        assert!(result.control.is_none());
    }

    #[tokio::test]
    async fn test_unimplemented_verb_is_unclassified() {
        for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
            let request = Request::new(method.clone(), "/echo");
            let err = invoke(&Echo, &request, &record()).await.unwrap_err();
            assert!(!err.is_classified());
            assert!(err.message().contains(method.as_str()));
        }
    }

    #[tokio::test]
    async fn test_unknown_verb_is_unclassified() {
        let request = Request::new(Method::OPTIONS, "/echo");
        let err = invoke(&Echo, &request, &record()).await.unwrap_err();
        assert!(!err.is_classified());
    }

    #[test]
    fn test_method_return_builders() {
        let mut control = Map::new();
        control.insert("Page".to_string(), json!(2));
        let ret = MethodReturn::new("ok")
            .with_control(control.clone())
            .with_audit_record(record());
        assert_eq!(ret.body, json!("ok"));
        assert_eq!(ret.control, Some(control));
        assert!(ret.audit_record.is_some());
    }
}
