//! Test client for in-memory invocations.

use crate::error::TestError;
use crate::event::EventBuilder;
use crate::invocation::TestInvocation;
use crate::response::TestResponse;
use http::Method;
use lambda_router_core::{InvocationContext, ProxyResponse};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Handler function type for the test client.
pub type TestHandler = Arc<
    dyn Fn(Value, InvocationContext) -> Pin<Box<dyn Future<Output = ProxyResponse> + Send>>
        + Send
        + Sync,
>;

/// Drives a function handler with proxy events, without any platform.
///
/// # Example
///
/// ```
/// use lambda_router_test::TestClient;
/// use lambda_router_core::{Envelope, ProxyResponse, ResponseCode};
///
/// # tokio_test::block_on(async {
/// let client = TestClient::new(|_event, ctx| async move {
///     let envelope = Envelope::new(ResponseCode::Success, "pong").with_trace_id(ctx.request_id());
///     ProxyResponse::from_envelope(&envelope)
/// });
///
/// let response = client.get("/v1/ping").send().await.unwrap();
/// response.assert_success().assert_data("pong");
/// # });
/// ```
#[must_use]
pub struct TestClient {
    handler: TestHandler,
    timeout_secs: u64,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a client around a handler function.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Value, InvocationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ProxyResponse> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |event, ctx| {
                Box::pin(handler(event, ctx))
                    as Pin<Box<dyn Future<Output = ProxyResponse> + Send>>
            }),
            timeout_secs: 25,
            default_headers: Vec::new(),
        }
    }

    /// Sets the function timeout every invocation gets.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Creates a request for any method.
    pub fn request(&self, method: Method, path: impl Into<String>) -> TestClientRequest<'_> {
        let mut event = EventBuilder::new(method, path);
        for (name, value) in &self.default_headers {
            event = event.header(name.clone(), value.clone());
        }
        TestClientRequest {
            client: self,
            event,
            invocation: TestInvocation::new(self.timeout_secs),
        }
    }

    /// Creates a GET request.
    pub fn get(&self, path: impl Into<String>) -> TestClientRequest<'_> {
        self.request(Method::GET, path)
    }

    /// Creates a POST request.
    pub fn post(&self, path: impl Into<String>) -> TestClientRequest<'_> {
        self.request(Method::POST, path)
    }

    /// Creates a PUT request.
    pub fn put(&self, path: impl Into<String>) -> TestClientRequest<'_> {
        self.request(Method::PUT, path)
    }

    /// Creates a PATCH request.
    pub fn patch(&self, path: impl Into<String>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, path)
    }

    /// Creates a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, path)
    }

    /// Invokes the handler with a raw event.
    pub async fn invoke(&self, event: Value, ctx: InvocationContext) -> ProxyResponse {
        (self.handler)(event, ctx).await
    }
}

impl std::fmt::Debug for TestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestClient")
            .field("timeout_secs", &self.timeout_secs)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

/// A request being built against a [`TestClient`].
#[must_use]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    event: EventBuilder,
    invocation: TestInvocation,
}

impl TestClientRequest<'_> {
    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.event = self.event.header(name, value);
        self
    }

    /// Sets the `Authorization` header.
    pub fn authorization(mut self, token: impl Into<String>) -> Self {
        self.event = self.event.authorization(token);
        self
    }

    /// Adds a query string parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.event = self.event.query(name, value);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.event = self.event.json(body);
        self
    }

    /// Sets a raw text body.
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.event = self.event.raw_body(body);
        self
    }

    /// Sets the platform request id, which becomes the trace id.
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.event = self.event.request_id(request_id);
        self
    }

    /// Replaces the invocation settings. The request id still follows the
    /// event.
    pub fn invocation(mut self, invocation: TestInvocation) -> Self {
        self.invocation = invocation;
        self
    }

    /// Sends the request and decodes the response envelope.
    pub async fn send(self) -> Result<TestResponse, TestError> {
        let invocation = self
            .invocation
            .request_id(self.event.current_request_id())
            .build();
        let raw = self.client.invoke(self.event.build(), invocation).await;
        TestResponse::from_proxy(raw)
    }
}
