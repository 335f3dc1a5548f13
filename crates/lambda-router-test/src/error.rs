//! Test error types.

use thiserror::Error;

/// Errors that can occur during testing.
#[derive(Debug, Error)]
pub enum TestError {
    /// The proxy response body is not a valid envelope.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope has no usable `control.ResponseCode`.
    #[error("Missing response code in control: {0}")]
    MissingResponseCode(String),

    /// A field the test asked for is absent from `data`.
    #[error("Missing data field: {0}")]
    MissingField(String),
}
