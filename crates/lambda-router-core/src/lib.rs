//! # lambda-router core
//!
//! Core types shared by every lambda-router crate:
//!
//! - [`RouterError`] - The flat error taxonomy and its response codes
//! - [`Envelope`] / [`ProxyResponse`] - The uniform response shape
//! - [`AuditRecord`] - One audit trail entry per invocation
//! - [`Request`] - The normalized request handed to route handlers
//! - [`InvocationContext`] - Platform request id and remaining-time clock
//! - [`di::Container`] - Process-wide service registry

#![doc(html_root_url = "https://docs.rs/lambda-router-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod audit;
pub mod di;
mod error;
mod invocation;
mod request;
mod response;

pub use audit::{format_timestamp, utc_timestamp, AuditRecord, DeploymentInfo, TIMESTAMP_FORMAT};
pub use error::{ErrorCategory, RouterError, RouterResult};
pub use invocation::InvocationContext;
pub use request::Request;
pub use response::{
    Envelope, ProxyResponse, ResponseCode, GENERIC_ERROR_MESSAGE, RESPONSE_CODE_KEY, TRACE_ID_KEY,
};
