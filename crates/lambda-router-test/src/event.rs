//! API Gateway proxy event builder.

use http::Method;
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Headers a browser request through CloudFront typically carries.
const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("Accept", "application/json, text/plain, */*"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Accept-Language", "en-US,en;q=0.8"),
    ("cache-control", "no-cache"),
    ("CloudFront-Forwarded-Proto", "https"),
    ("CloudFront-Viewer-Country", "ZA"),
    ("content-type", "text/plain"),
    ("Host", "1aqbq1234.execute-api.eu-west-1.amazonaws.com"),
    ("origin", "http://localhost:8100"),
    ("X-Forwarded-For", "41.160.123.123, 54.182.123.123"),
    ("X-Forwarded-Port", "443"),
    ("X-Forwarded-Proto", "https"),
];

/// Builder for API Gateway proxy events.
///
/// # Example
///
/// ```
/// use lambda_router_test::EventBuilder;
/// use serde_json::json;
///
/// let event = EventBuilder::post("/v1/person")
///     .json(&json!({"name": "Rehan"}))
///     .authorization("token")
///     .build();
///
/// assert_eq!(event["httpMethod"], "POST");
/// assert_eq!(event["body"], r#"{"name":"Rehan"}"#);
/// assert_eq!(event["headers"]["Authorization"], "token");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct EventBuilder {
    method: Method,
    path: String,
    resource: Option<String>,
    headers: Map<String, Value>,
    query: Option<Map<String, Value>>,
    path_params: Option<Map<String, Value>>,
    body: Value,
    request_id: String,
    is_base64_encoded: bool,
}

impl EventBuilder {
    /// Creates a builder for `method` and `path` with the default headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let headers = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::from(*v)))
            .collect();
        Self {
            method,
            path: path.into(),
            resource: None,
            headers,
            query: None,
            path_params: None,
            body: Value::Null,
            request_id: Uuid::new_v4().to_string(),
            is_base64_encoded: true,
        }
    }

    /// Creates a GET event.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST event.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT event.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a PATCH event.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Creates a DELETE event.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets the resource template. Defaults to the path.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Adds or replaces a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Removes every header, including the defaults.
    pub fn without_headers(mut self) -> Self {
        self.headers.clear();
        self
    }

    /// Sets the `Authorization` header.
    pub fn authorization(self, token: impl Into<String>) -> Self {
        self.header("Authorization", token)
    }

    /// Sets the `x-api-key` header.
    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.header("x-api-key", key)
    }

    /// Adds a query string parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(Map::new)
            .insert(name.into(), Value::String(value.into()));
        self
    }

    /// Adds a path parameter.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params
            .get_or_insert_with(Map::new)
            .insert(name.into(), Value::String(value.into()));
        self
    }

    /// Sets the body to the JSON text of `body`.
    ///
    /// A value that cannot be serialized leaves the body unset.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = serde_json::to_string(body).map_or(Value::Null, Value::String);
        self
    }

    /// Sets the body to raw text, which need not be JSON.
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Value::String(body.into());
        self
    }

    /// Sets the platform request id.
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Sets `isBase64Encoded`.
    pub fn base64_encoded(mut self, flag: bool) -> Self {
        self.is_base64_encoded = flag;
        self
    }

    /// Returns the platform request id the event will carry.
    #[must_use]
    pub fn current_request_id(&self) -> &str {
        &self.request_id
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Value {
        let resource = self.resource.unwrap_or_else(|| self.path.clone());
        json!({
            "resource": resource,
            "path": self.path,
            "httpMethod": self.method.as_str(),
            "headers": self.headers,
            "queryStringParameters": self.query,
            "pathParameters": self.path_params,
            "stageVariables": null,
            "requestContext": {
                "path": resource,
                "stage": "test",
                "requestId": self.request_id,
                "identity": {
                    "sourceIp": "41.160.123.123",
                    "apiKey": ""
                },
                "resourcePath": resource,
                "httpMethod": self.method.as_str()
            },
            "body": self.body,
            "isBase64Encoded": self.is_base64_encoded
        })
    }
}
