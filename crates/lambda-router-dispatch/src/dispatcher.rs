//! The pipeline's dispatch step.
//!
//! [`RouteDispatcher`] resolves the normalized request against a [`Router`],
//! calls the resource method for the HTTP verb and turns its
//! [`MethodReturn`] into the success envelope.

use crate::{
    resource::{invoke, MethodReturn},
    router::Router,
};
use lambda_router_core::{
    di::Container, Envelope, ProxyResponse, ResponseCode, RouterError, RouterResult,
};
use lambda_router_middleware::{BoxFuture, Dispatch, HandlerContext};
use std::sync::Arc;
use tracing::debug;

/// Dispatches normalized requests to registered resources.
#[derive(Debug, Clone)]
pub struct RouteDispatcher {
    router: Arc<Router>,
    container: Arc<Container>,
}

impl RouteDispatcher {
    /// Creates a dispatcher over `router`, building resources from
    /// `container`.
    #[must_use]
    pub fn new(router: Arc<Router>, container: Arc<Container>) -> Self {
        Self { router, container }
    }

    /// Returns the route registry.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Applies a successful method return to the context.
    fn complete(ctx: &mut HandlerContext, outcome: MethodReturn) -> RouterResult<()> {
        let MethodReturn {
            body,
            control,
            audit_record,
        } = outcome;

        if let Some(record) = audit_record {
            ctx.set_audit_record(record);
        }
        ctx.require_audit_record_mut()?.record_success();

        let envelope = Envelope::new(ResponseCode::Success, body)
            .with_control(control.unwrap_or_default())
            .with_trace_id(ctx.trace_id());
        ctx.set_response(ProxyResponse::from_envelope(&envelope));
        Ok(())
    }
}

impl Dispatch for RouteDispatcher {
    fn dispatch<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        Box::pin(async move {
            let outcome = {
                let request = ctx.require_request()?;
                let audit = ctx
                    .audit_record()
                    .ok_or_else(|| RouterError::unclassified("audit record has not been created"))?;
                let resource = self.router.resolve(request.path(), &self.container)?;

                debug!(
                    trace_id = ctx.trace_id(),
                    http_method = %request.method(),
                    http_path = request.path(),
                    "Invoking resource"
                );
                invoke(resource.as_ref(), request, audit).await?
            };

            Self::complete(ctx, outcome)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;
    use http::Method;
    use lambda_router_core::{AuditRecord, DeploymentInfo, InvocationContext, Request};
    use serde_json::{json, Map};
    use std::time::Duration;

    struct Person;

    impl Resource for Person {
        fn get<'a>(
            &'a self,
            request: &'a Request,
            _audit: &'a AuditRecord,
        ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
            Box::pin(async move {
                let mut control = Map::new();
                control.insert("TraceID".to_string(), json!("spoofed"));
                control.insert("ResponseCode".to_string(), json!(1234));
                control.insert("Page".to_string(), json!(1));
                Ok(MethodReturn::new(json!({"path": request.path()})).with_control(control))
            })
        }

        fn post<'a>(
            &'a self,
            _request: &'a Request,
            audit: &'a AuditRecord,
        ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
            Box::pin(async move {
                let mut record = audit.clone();
                record.meta = Some("person.create".to_string());
                Ok(MethodReturn::new("created").with_audit_record(record))
            })
        }

        fn delete<'a>(
            &'a self,
            _request: &'a Request,
            _audit: &'a AuditRecord,
        ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
            Box::pin(async { Err(RouterError::handled("Person is archived")) })
        }
    }

    fn dispatcher() -> RouteDispatcher {
        let mut router = Router::new();
        router.insert_shared("/v1/person", Arc::new(Person));
        RouteDispatcher::new(Arc::new(router), Arc::new(Container::new()))
    }

    fn context(method: Method, path: &str) -> HandlerContext {
        let mut ctx = HandlerContext::new(
            json!({}),
            InvocationContext::new("trace-d", Duration::from_secs(3)),
        );
        ctx.set_audit_record(AuditRecord::start("trace-d", "o", &DeploymentInfo::default()));
        ctx.set_request(Request::new(method, path));
        ctx
    }

    #[tokio::test]
    async fn test_success_builds_envelope() {
        let mut ctx = context(Method::GET, "/v1/person/42");
        dispatcher().dispatch(&mut ctx).await.unwrap();

        let envelope = ctx.response().unwrap().envelope().unwrap();
        assert_eq!(envelope.response_code(), Some(ResponseCode::Success));
        assert_eq!(envelope.trace_id(), Some("trace-d"));
        assert_eq!(envelope.control.get("Page"), Some(&json!(1)));
        assert_eq!(envelope.data, json!({"path": "/v1/person/42"}));

        let record = ctx.audit_record().unwrap();
        assert_eq!(record.status, Some(true));
        assert_eq!(record.status_code, Some(2000));
    }

    #[tokio::test]
    async fn test_audit_record_override() {
        let mut ctx = context(Method::POST, "/v1/person");
        dispatcher().dispatch(&mut ctx).await.unwrap();

        let record = ctx.audit_record().unwrap();
        assert_eq!(record.meta.as_deref(), Some("person.create"));
        assert_eq!(record.status_code, Some(2000));
    }

    #[tokio::test]
    async fn test_handler_error_returned() {
        let mut ctx = context(Method::DELETE, "/v1/person");
        let err = dispatcher().dispatch(&mut ctx).await.unwrap_err();
        assert_eq!(err.response_code(), ResponseCode::Handled);
        assert!(ctx.response().is_none());
        assert!(!ctx.audit_record().unwrap().has_outcome());
    }

    #[tokio::test]
    async fn test_unknown_route_is_unclassified() {
        let mut ctx = context(Method::GET, "/v1/nothing");
        let err = dispatcher().dispatch(&mut ctx).await.unwrap_err();
        assert_eq!(err.response_code(), ResponseCode::Unexpected);
    }

    #[tokio::test]
    async fn test_unsupported_verb_is_unclassified() {
        let mut ctx = context(Method::PUT, "/v1/person");
        let err = dispatcher().dispatch(&mut ctx).await.unwrap_err();
        assert_eq!(err.response_code(), ResponseCode::Unexpected);
    }

    #[tokio::test]
    async fn test_missing_request_fails() {
        let mut ctx = HandlerContext::new(
            json!({}),
            InvocationContext::new("t", Duration::from_secs(3)),
        );
        assert!(dispatcher().dispatch(&mut ctx).await.is_err());
    }
}
