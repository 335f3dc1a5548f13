//! Request normalization middleware.
//!
//! Turns the raw API Gateway proxy event into a [`Request`]:
//!
//! - `httpMethod` becomes an [`http::Method`]
//! - `path` loses its trailing slash, except for the root path
//! - `queryStringParameters` and `pathParameters` become maps (absent is empty)
//! - `headers` become a [`HeaderMap`]; entries that are not valid header
//!   names or values are skipped
//! - the `Authorization` header is exposed separately
//! - `body` is parsed as JSON; a missing or unparsable body is `null`
//!
//! The normalizer also stamps `origin_path` and `meta` on the audit record.
//!
//! `isBase64Encoded` is accepted but ignored: bodies are always read as UTF-8
//! JSON text.

use crate::{
    context::HandlerContext,
    middleware::{BoxFuture, Middleware},
    pipeline::Stage,
};
use http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, Method};
use lambda_router_core::{Request, RouterError, RouterResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The subset of an API Gateway proxy event the normalizer reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    /// HTTP verb, e.g. `"POST"`.
    pub http_method: String,
    /// Request path, e.g. `"/v1/person/"`.
    pub path: String,
    /// Matched resource template.
    #[serde(default)]
    pub resource: Option<String>,
    /// Request headers.
    #[serde(default)]
    pub headers: Option<BTreeMap<String, Option<String>>>,
    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, Option<String>>>,
    /// Path parameters.
    #[serde(default)]
    pub path_parameters: Option<BTreeMap<String, Option<String>>>,
    /// Raw body. Usually a JSON string, sometimes an inline object.
    #[serde(default)]
    pub body: Option<Value>,
    /// Base64 flag set by the gateway.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyEvent {
    /// Reads a proxy event out of a raw JSON event.
    ///
    /// # Errors
    ///
    /// Returns an unclassified error when the event lacks `httpMethod` or
    /// `path`, or has fields of the wrong type.
    pub fn from_value(event: &Value) -> RouterResult<Self> {
        Self::deserialize(event).map_err(|e| {
            RouterError::unclassified_with_source("malformed proxy event", e)
        })
    }
}

/// Strips trailing slashes from `path`. The root path stays `"/"`.
///
/// ```
/// use lambda_router_middleware::stages::normalize_path;
///
/// assert_eq!(normalize_path("/v1/person/"), "/v1/person");
/// assert_eq!(normalize_path("/"), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a raw body into JSON. Anything unparsable becomes `null`.
#[must_use]
pub fn parse_body(body: Option<&Value>) -> Value {
    match body {
        Some(Value::String(text)) => serde_json::from_str(text).unwrap_or(Value::Null),
        Some(value) => value.clone(),
        None => Value::Null,
    }
}

fn parse_method(raw: &str) -> RouterResult<Method> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|e| RouterError::unclassified_with_source(format!("invalid method: {raw}"), e))
}

fn flatten(map: Option<&BTreeMap<String, Option<String>>>) -> BTreeMap<String, String> {
    map.map(|m| {
        m.iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
            .collect()
    })
    .unwrap_or_default()
}

fn header_map(headers: Option<&BTreeMap<String, Option<String>>>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in flatten(headers) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                map.append(name, value);
            }
            _ => debug!(header = %name, "Skipping invalid header"),
        }
    }
    map
}

/// Middleware that builds the normalized [`Request`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestNormalizerMiddleware;

impl RequestNormalizerMiddleware {
    /// Creates a new request normalizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds a [`Request`] from a proxy event.
    ///
    /// # Errors
    ///
    /// Returns an unclassified error for an unknown HTTP method.
    pub fn normalize(event: &ProxyEvent) -> RouterResult<Request> {
        let method = parse_method(&event.http_method)?;
        let headers = header_map(event.headers.as_ref());
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut request = Request::new(method, normalize_path(&event.path))
            .with_query(flatten(event.query_string_parameters.as_ref()))
            .with_path_params(flatten(event.path_parameters.as_ref()))
            .with_headers(headers)
            .with_body(parse_body(event.body.as_ref()));
        if let Some(authorization) = authorization {
            request = request.with_authorization(authorization);
        }
        Ok(request)
    }
}

impl Middleware for RequestNormalizerMiddleware {
    fn name(&self) -> &'static str {
        Stage::RequestNormalizer.name()
    }

    fn before<'a>(&'a self, ctx: &'a mut HandlerContext) -> BoxFuture<'a, RouterResult<()>> {
        Box::pin(async move {
            let event = ProxyEvent::from_value(ctx.event())?;
            let request = Self::normalize(&event)?;

            info!(
                trace_id = ctx.trace_id(),
                http_method = %request.method(),
                http_path = request.path(),
                query = ?request.query(),
                "Request"
            );

            let record = ctx.require_audit_record_mut()?;
            record.origin_path = Some(request.path().to_string());
            record.meta = Some(request.method().to_string());

            ctx.set_request(request);
            Ok(())
        })
    }
}
