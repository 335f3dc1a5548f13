//! Error types for lambda-router.
//!
//! This module provides the [`RouterError`] type, the single failure type that
//! flows through the middleware pipeline and business handlers.
//!
//! The taxonomy is deliberately flat. Three kinds are *classified* and safe to
//! show to a caller verbatim; everything else is *unclassified* and is replaced
//! by a generic message before it leaves the pipeline.
//!
//! | Variant | [`ResponseCode`] | Message returned to caller |
//! |---|---|---|
//! | `Handled` | `5001` | raw message |
//! | `Validation` | `5002` | raw message |
//! | `Auth` | `3001` | raw message |
//! | `Unclassified` | `5000` | `"Unexpected Error Occurred"` |

use crate::di::InjectionError;
use crate::response::{ResponseCode, GENERIC_ERROR_MESSAGE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`RouterError`].
pub type RouterResult<T> = Result<T, RouterError>;

/// Classification of a [`RouterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Business rule failure the handler anticipated.
    Handled,
    /// Invalid caller input.
    Validation,
    /// Missing or rejected credentials.
    Auth,
    /// Anything else, including infrastructure failures.
    Unclassified,
}

impl ErrorCategory {
    /// Returns the envelope response code for this category.
    #[must_use]
    pub const fn response_code(&self) -> ResponseCode {
        match self {
            Self::Handled => ResponseCode::Handled,
            Self::Validation => ResponseCode::Validation,
            Self::Auth => ResponseCode::Auth,
            Self::Unclassified => ResponseCode::Unexpected,
        }
    }
}

/// Standard error type for lambda-router.
///
/// The `Display` output is always the raw message, which is what ends up in
/// the audit record's `status_description`.
///
/// # Example
///
/// ```
/// use lambda_router_core::{ErrorCategory, RouterError};
///
/// fn check_name(name: &str) -> Result<(), RouterError> {
///     if name.is_empty() {
///         return Err(RouterError::validation("Field: name is required"));
///     }
///     Ok(())
/// }
///
/// let err = check_name("").unwrap_err();
/// assert_eq!(err.category(), ErrorCategory::Validation);
/// assert_eq!(err.to_string(), "Field: name is required");
/// ```
#[derive(Error, Debug)]
pub enum RouterError {
    /// A business rule failure raised deliberately by a handler.
    #[error("{message}")]
    Handled {
        /// Human-readable error message.
        message: String,
    },

    /// Caller input failed validation.
    #[error("{message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// Caller is not authenticated or not allowed.
    #[error("{message}")]
    Auth {
        /// Human-readable error message.
        message: String,
    },

    /// Any other failure. Never shown to callers.
    #[error("{message}")]
    Unclassified {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl RouterError {
    /// Creates a handled error.
    #[must_use]
    pub fn handled(message: impl Into<String>) -> Self {
        Self::Handled {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an auth error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates an unclassified error.
    #[must_use]
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unclassified error wrapping a source error.
    pub fn unclassified_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Unclassified {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the raw error message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Handled { message }
            | Self::Validation { message }
            | Self::Auth { message }
            | Self::Unclassified { message, .. } => message,
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Handled { .. } => ErrorCategory::Handled,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Auth { .. } => ErrorCategory::Auth,
            Self::Unclassified { .. } => ErrorCategory::Unclassified,
        }
    }

    /// Returns the envelope response code for this error.
    #[must_use]
    pub const fn response_code(&self) -> ResponseCode {
        self.category().response_code()
    }

    /// Returns `true` for the kinds whose message may be returned verbatim.
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        !matches!(self, Self::Unclassified { .. })
    }

    /// Returns the message that is safe to place in a response body.
    #[must_use]
    pub fn client_message(&self) -> &str {
        if self.is_classified() {
            self.message()
        } else {
            GENERIC_ERROR_MESSAGE
        }
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::unclassified_with_source(format!("JSON error: {err}"), err)
    }
}

impl From<anyhow::Error> for RouterError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unclassified {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<InjectionError> for RouterError {
    fn from(err: InjectionError) -> Self {
        Self::unclassified(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_validation_error() {
        let error = RouterError::validation("Field: client_id is required");
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.response_code(), ResponseCode::Validation);
        assert_eq!(error.to_string(), "Field: client_id is required");
        assert_eq!(error.client_message(), "Field: client_id is required");
    }

    #[test]
    fn test_handled_error() {
        let error = RouterError::handled("Person already exists");
        assert_eq!(error.response_code().as_u16(), 5001);
        assert!(error.is_classified());
    }

    #[test]
    fn test_auth_error() {
        let error = RouterError::auth("Token expired");
        assert_eq!(error.response_code().as_u16(), 3001);
        assert_eq!(error.client_message(), "Token expired");
    }

    #[test]
    fn test_unclassified_hides_message() {
        let error = RouterError::unclassified("connection refused to 10.0.0.4");
        assert_eq!(error.response_code().as_u16(), 5000);
        assert!(!error.is_classified());
        assert_eq!(error.message(), "connection refused to 10.0.0.4");
        assert_eq!(error.client_message(), "Unexpected Error Occurred");
    }

    #[test]
    fn test_unclassified_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = RouterError::unclassified_with_source("write failed", io);
        assert_eq!(error.to_string(), "write failed");
        assert!(error.source().is_some());
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let error: RouterError = parse.unwrap_err().into();
        assert_eq!(error.category(), ErrorCategory::Unclassified);
        assert!(error.message().starts_with("JSON error"));
    }

    #[test]
    fn test_from_anyhow() {
        let error: RouterError = anyhow::anyhow!("boom").into();
        assert_eq!(error.category(), ErrorCategory::Unclassified);
        assert_eq!(error.message(), "boom");
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ErrorCategory::Unclassified).unwrap();
        assert_eq!(json, "\"unclassified\"");
    }
}
