//! Test response wrapper.

use crate::error::TestError;
use lambda_router_core::{Envelope, ProxyResponse, ResponseCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A proxy response with its envelope decoded, plus assertion helpers.
#[derive(Debug, Clone)]
pub struct TestResponse {
    raw: ProxyResponse,
    envelope: Envelope,
}

impl TestResponse {
    /// Decodes the envelope out of a proxy response.
    pub fn from_proxy(raw: ProxyResponse) -> Result<Self, TestError> {
        let envelope = raw.envelope()?;
        Ok(Self { raw, envelope })
    }

    /// Returns the raw proxy response.
    #[must_use]
    pub fn raw(&self) -> &ProxyResponse {
        &self.raw
    }

    /// Returns the transport status code.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.raw.status_code
    }

    /// Gets a response header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.headers.get(name).map(String::as_str)
    }

    /// Returns the decoded envelope.
    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Returns `control.ResponseCode` as a number.
    pub fn response_code_raw(&self) -> Result<u16, TestError> {
        self.envelope
            .control
            .get("ResponseCode")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .ok_or_else(|| TestError::MissingResponseCode(self.raw.body.clone()))
    }

    /// Returns `control.ResponseCode` as a known code.
    #[must_use]
    pub fn response_code(&self) -> Option<ResponseCode> {
        self.envelope.response_code()
    }

    /// Returns `control.TraceID`.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.envelope.trace_id()
    }

    /// Returns `data`.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.envelope.data
    }

    /// Returns `data[field]`.
    pub fn data_field(&self, field: &str) -> Result<&Value, TestError> {
        self.envelope
            .data
            .get(field)
            .ok_or_else(|| TestError::MissingField(field.to_string()))
    }

    /// Deserializes `data`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_value(self.envelope.data.clone())?)
    }

    // Assertion methods

    /// Asserts that `control.ResponseCode` equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the code differs or is missing.
    pub fn assert_code(&self, expected: ResponseCode) -> &Self {
        assert_eq!(
            self.response_code(),
            Some(expected),
            "Expected response code {}, got body {}",
            expected,
            self.raw.body
        );
        self
    }

    /// Asserts a successful (2000) response.
    ///
    /// # Panics
    ///
    /// Panics if the code is not 2000.
    pub fn assert_success(&self) -> &Self {
        self.assert_code(ResponseCode::Success)
    }

    /// Asserts that `data` equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if `data` differs.
    pub fn assert_data(&self, expected: impl Into<Value>) -> &Self {
        let expected = expected.into();
        assert_eq!(
            self.envelope.data, expected,
            "Expected data {}, got {}",
            expected, self.envelope.data
        );
        self
    }

    /// Asserts that `control.TraceID` equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the trace id differs or is missing.
    pub fn assert_trace_id(&self, expected: &str) -> &Self {
        assert_eq!(self.trace_id(), Some(expected), "Unexpected TraceID");
        self
    }

    /// Asserts that a response header has the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        assert_eq!(
            self.header(name),
            Some(expected),
            "Expected header {name} to be {expected}"
        );
        self
    }
}
