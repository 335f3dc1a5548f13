//! # lambda-router test
//!
//! Test utilities for lambda-router functions: build API Gateway proxy
//! events, run them through a handler in memory and assert on the decoded
//! envelope.
//!
//! ## Key Features
//!
//! - **Event Builder**: Proxy events with realistic default headers
//! - **Invocation Clock**: Platform-style request id and remaining time
//! - **Test Client**: Fluent requests against any handler function
//! - **Response Assertions**: Response code, data and trace id checks
//!
//! ## Example
//!
//! ```
//! use lambda_router_test::{EventBuilder, TestInvocation};
//! use serde_json::json;
//!
//! let event = EventBuilder::post("/v1/person")
//!     .json(&json!({"client_id": "c-1", "name": "Rehan", "email": "r@example.com"}))
//!     .build();
//! let ctx = TestInvocation::new(25).build();
//!
//! assert_eq!(event["httpMethod"], "POST");
//! assert!(ctx.remaining_time_ms() <= 25_000);
//! ```

#![doc(html_root_url = "https://docs.rs/lambda-router-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod event;
mod invocation;
mod response;

pub use client::{TestClient, TestClientRequest, TestHandler};
pub use error::TestError;
pub use event::EventBuilder;
pub use invocation::TestInvocation;
pub use response::TestResponse;
