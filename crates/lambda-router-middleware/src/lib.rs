//! # lambda-router middleware
//!
//! Before/after middleware pipeline wrapped around every invocation.
//!
//! ## Pipeline Stages
//!
//! ```text
//! event → ErrorClassifier.before → AuditLog.before → RequestNormalizer.before
//!                                                              ↓
//!                                                          dispatch
//!                                                              ↓
//! response ← ErrorClassifier.after ← AuditLog.after ← RequestNormalizer.after
//! ```
//!
//! | Stage | Middleware         | Purpose                                  |
//! |-------|--------------------|------------------------------------------|
//! | 1     | Error Classifier   | Map errors to response codes             |
//! | 2     | Audit Log          | One audit record per invocation          |
//! | 3     | Request Normalizer | Proxy event to [`Request`](lambda_router_core::Request) |
//!
//! A failing `before` stops the remaining `before` phases and skips
//! dispatch. Every stage whose `before` was entered gets its `after`
//! exactly once.
//!
//! ## Example
//!
//! ```
//! use lambda_router_middleware::pipeline::Stage;
//!
//! let stages = Stage::all();
//! assert_eq!(stages.len(), 3);
//! assert_eq!(stages[0].name(), "error_classifier");
//! assert_eq!(stages[2].name(), "request_normalizer");
//! ```

#![doc(html_root_url = "https://docs.rs/lambda-router-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;

pub use context::HandlerContext;
pub use middleware::{BoxFuture, Dispatch, FnDispatch, Middleware};
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder, Stage};
