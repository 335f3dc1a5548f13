//! End-to-end pipeline integration tests.
//!
//! These tests run the standard three-stage pipeline against raw proxy
//! events and check the envelope and the emitted audit record together:
//!
//! 1. Error Classifier - Map errors to response codes
//! 2. Audit Log - Create and emit the audit record
//! 3. Request Normalizer - Build the normalized request

use lambda_router_core::{
    DeploymentInfo, Envelope, InvocationContext, ProxyResponse, ResponseCode, RouterError,
    GENERIC_ERROR_MESSAGE,
};
use lambda_router_middleware::{
    pipeline::Pipeline,
    stages::{AuditLogMiddleware, MemoryAuditSink},
    FnDispatch, HandlerContext,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn pipeline(sink: &Arc<MemoryAuditSink>) -> Pipeline {
    Pipeline::standard(
        AuditLogMiddleware::new("LambdaMiddlewareRouter::api")
            .with_deployment(DeploymentInfo {
                environment: "test".to_string(),
                version: "1.0.0".to_string(),
                build: "1".to_string(),
            })
            .with_timeout(Duration::from_secs(3))
            .with_sink(sink.clone()),
    )
}

fn context(event: Value) -> HandlerContext {
    HandlerContext::new(
        event,
        InvocationContext::new("e2e-trace", Duration::from_secs(3)),
    )
}

fn ping_event() -> Value {
    json!({
        "httpMethod": "GET",
        "path": "/v1/ping/",
        "headers": {"Accept": "application/json"},
        "queryStringParameters": null,
        "body": null
    })
}

/// Echoes the normalized method and path back as a success envelope.
fn echo(ctx: &mut HandlerContext) -> lambda_router_core::RouterResult<()> {
    let request = ctx.require_request()?;
    let data = json!({"method": request.method().as_str(), "path": request.path()});
    let envelope = Envelope::new(ResponseCode::Success, data).with_trace_id(ctx.trace_id());
    ctx.require_audit_record_mut()?.record_success();
    ctx.set_response(ProxyResponse::from_envelope(&envelope));
    Ok(())
}

#[tokio::test]
async fn test_success_flow() {
    let sink = Arc::new(MemoryAuditSink::new());
    let response = pipeline(&sink)
        .process(context(ping_event()), &FnDispatch::new(echo))
        .await;

    assert_eq!(response.status_code, 200);
    let envelope = response.envelope().unwrap();
    assert_eq!(envelope.response_code(), Some(ResponseCode::Success));
    assert_eq!(envelope.trace_id(), Some("e2e-trace"));
    assert_eq!(envelope.data, json!({"method": "GET", "path": "/v1/ping"}));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, Some(true));
    assert_eq!(records[0].status_code, Some(2000));
    assert_eq!(records[0].origin_path.as_deref(), Some("/v1/ping"));
    assert_eq!(records[0].meta.as_deref(), Some("GET"));
    assert!(records[0].run_time.is_some());
}

#[tokio::test]
async fn test_validation_failure_flow() {
    let sink = Arc::new(MemoryAuditSink::new());
    let dispatch = FnDispatch::new(|_ctx: &mut HandlerContext| {
        Err(RouterError::validation(
            "Field: name is required and can not be longer than 50 characters",
        ))
    });

    let response = pipeline(&sink).process(context(ping_event()), &dispatch).await;

    let envelope = response.envelope().unwrap();
    assert_eq!(envelope.response_code(), Some(ResponseCode::Validation));
    assert_eq!(
        envelope.data,
        "Field: name is required and can not be longer than 50 characters"
    );

    let record = sink.last().unwrap();
    assert_eq!(record.status, Some(false));
    assert_eq!(record.status_code, Some(5002));
    assert!(record.raise_alarm);
}

#[tokio::test]
async fn test_unclassified_failure_is_masked() {
    let sink = Arc::new(MemoryAuditSink::new());
    let dispatch = FnDispatch::new(|_ctx: &mut HandlerContext| {
        Err(RouterError::unclassified("connection reset by peer"))
    });

    let response = pipeline(&sink).process(context(ping_event()), &dispatch).await;

    let envelope = response.envelope().unwrap();
    assert_eq!(envelope.response_code(), Some(ResponseCode::Unexpected));
    assert_eq!(envelope.data, GENERIC_ERROR_MESSAGE);
    assert_eq!(
        sink.last().unwrap().status_description.as_deref(),
        Some("connection reset by peer")
    );
}

#[tokio::test]
async fn test_malformed_event_skips_dispatch() {
    let sink = Arc::new(MemoryAuditSink::new());
    let dispatch = FnDispatch::new(|_ctx: &mut HandlerContext| {
        panic!("dispatch must not run for a malformed event")
    });

    let response = pipeline(&sink)
        .process(context(json!({"path": "/v1/ping"})), &dispatch)
        .await;

    let envelope = response.envelope().unwrap();
    assert_eq!(envelope.response_code(), Some(ResponseCode::Unexpected));
    assert_eq!(envelope.trace_id(), Some("e2e-trace"));

    // The audit stage had started, so its record is still emitted.
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.last().unwrap().status_code, Some(5000));
}

#[tokio::test]
async fn test_audit_emitted_once_per_invocation() {
    let sink = Arc::new(MemoryAuditSink::new());
    let pipeline = pipeline(&sink);

    for _ in 0..3 {
        pipeline
            .process(context(ping_event()), &FnDispatch::new(echo))
            .await;
    }

    let records = sink.records();
    assert_eq!(records.len(), 3);
    assert_ne!(records[0].id, records[1].id);
}
