//! Response envelope and proxy response types.
//!
//! Every invocation answers with transport status `200`; the outcome lives in
//! the envelope's `control.ResponseCode`:
//!
//! ```json
//! {"control": {"ResponseCode": 2000, "TraceID": "c6af9ac6"}, "data": "pong"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Body returned for failures whose message must not reach the caller.
pub const GENERIC_ERROR_MESSAGE: &str = "Unexpected Error Occurred";

/// Control key carrying the [`ResponseCode`].
pub const RESPONSE_CODE_KEY: &str = "ResponseCode";

/// Control key carrying the invocation trace id.
pub const TRACE_ID_KEY: &str = "TraceID";

/// Outcome codes carried in `control.ResponseCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ResponseCode {
    /// The handler completed.
    Success = 2000,
    /// Unclassified failure.
    Unexpected = 5000,
    /// Handled business failure.
    Handled = 5001,
    /// Input validation failure.
    Validation = 5002,
    /// Authentication or authorization failure.
    Auth = 3001,
}

impl ResponseCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Looks up a code by its numeric value.
    #[must_use]
    pub const fn from_u16(code: u16) -> Option<Self> {
        match code {
            2000 => Some(Self::Success),
            5000 => Some(Self::Unexpected),
            5001 => Some(Self::Handled),
            5002 => Some(Self::Validation),
            3001 => Some(Self::Auth),
            _ => None,
        }
    }

    /// Returns `true` for [`ResponseCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl From<ResponseCode> for u16 {
    fn from(code: ResponseCode) -> Self {
        code.as_u16()
    }
}

/// The JSON document placed in the proxy response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Response code, trace id and any extra control fields.
    pub control: Map<String, Value>,
    /// Handler payload or error description.
    pub data: Value,
}

impl Envelope {
    /// Creates an envelope with the given code and payload.
    #[must_use]
    pub fn new(code: ResponseCode, data: impl Into<Value>) -> Self {
        let mut control = Map::new();
        control.insert(RESPONSE_CODE_KEY.to_string(), json!(code.as_u16()));
        Self {
            control,
            data: data.into(),
        }
    }

    /// Merges extra control fields. `ResponseCode` cannot be overridden.
    #[must_use]
    pub fn with_control(mut self, extra: Map<String, Value>) -> Self {
        for (key, value) in extra {
            if key != RESPONSE_CODE_KEY {
                self.control.insert(key, value);
            }
        }
        self
    }

    /// Sets `control.TraceID`.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.control
            .insert(TRACE_ID_KEY.to_string(), Value::String(trace_id.into()));
        self
    }

    /// Returns the response code, if it is a known one.
    #[must_use]
    pub fn response_code(&self) -> Option<ResponseCode> {
        self.control
            .get(RESPONSE_CODE_KEY)
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .and_then(ResponseCode::from_u16)
    }

    /// Returns `control.TraceID`.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.control.get(TRACE_ID_KEY).and_then(Value::as_str)
    }

    /// Converts the envelope into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "control": self.control,
            "data": self.data,
        })
    }
}

/// API-Gateway proxy integration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// Transport status. Always `200`.
    pub status_code: u16,
    /// Response headers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Serialized [`Envelope`].
    pub body: String,
}

impl ProxyResponse {
    /// Wraps an envelope with the standard JSON and CORS headers.
    #[must_use]
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        Self {
            status_code: 200,
            headers,
            body: envelope.to_value().to_string(),
        }
    }

    /// Builds the response returned for unclassified failures.
    #[must_use]
    pub fn unexpected(trace_id: impl Into<String>) -> Self {
        Self::from_envelope(
            &Envelope::new(ResponseCode::Unexpected, GENERIC_ERROR_MESSAGE).with_trace_id(trace_id),
        )
    }

    /// Parses the body back into an [`Envelope`].
    pub fn envelope(&self) -> Result<Envelope, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_values() {
        assert_eq!(ResponseCode::Success.as_u16(), 2000);
        assert_eq!(ResponseCode::Unexpected.as_u16(), 5000);
        assert_eq!(ResponseCode::Handled.as_u16(), 5001);
        assert_eq!(ResponseCode::Validation.as_u16(), 5002);
        assert_eq!(ResponseCode::Auth.as_u16(), 3001);
        assert_eq!(ResponseCode::from_u16(3001), Some(ResponseCode::Auth));
        assert_eq!(ResponseCode::from_u16(404), None);
    }

    #[test]
    fn test_envelope_control() {
        let mut extra = Map::new();
        extra.insert("Page".to_string(), json!(2));
        extra.insert(RESPONSE_CODE_KEY.to_string(), json!(1));

        let envelope = Envelope::new(ResponseCode::Success, "pong")
            .with_control(extra)
            .with_trace_id("trace-1");

        assert_eq!(envelope.response_code(), Some(ResponseCode::Success));
        assert_eq!(envelope.trace_id(), Some("trace-1"));
        assert_eq!(envelope.control["Page"], 2);
        assert_eq!(envelope.data, "pong");
    }

    #[test]
    fn test_proxy_response_shape() {
        let response = ProxyResponse::from_envelope(
            &Envelope::new(ResponseCode::Validation, "bad input").with_trace_id("t"),
        );
        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Content-Type"], "application/json");

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 200);

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["control"]["ResponseCode"], 5002);
        assert_eq!(body["control"]["TraceID"], "t");
        assert_eq!(body["data"], "bad input");
    }

    #[test]
    fn test_unexpected_response() {
        let envelope = ProxyResponse::unexpected("abc").envelope().unwrap();
        assert_eq!(envelope.response_code(), Some(ResponseCode::Unexpected));
        assert_eq!(envelope.data, GENERIC_ERROR_MESSAGE);
    }
}
