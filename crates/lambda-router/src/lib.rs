//! # lambda-router
//!
//! **Middleware router for serverless HTTP API functions**
//!
//! Every invocation takes an API-Gateway proxy event through a fixed
//! middleware pipeline, dispatches it to the resource registered for its
//! path, and returns a proxy response whose body is a uniform envelope:
//!
//! ```json
//! {"control": {"ResponseCode": 2000, "TraceID": "c6af9ac6-..."}, "data": "pong"}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lambda_router::prelude::*;
//!
//! let app = App::from_env()?;
//! let response = app.handle(event, InvocationContext::new(request_id, timeout)).await;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! event → ErrorClassifier → AuditLog → RequestNormalizer → RouteDispatcher
//!                                                                ↓
//! response ← ErrorClassifier ← AuditLog ← RequestNormalizer ←────┘
//! ```
//!
//! | Code | Meaning |
//! |------|---------|
//! | 2000 | Success |
//! | 3001 | Authentication/authorization failure |
//! | 5000 | Unexpected error (message masked) |
//! | 5001 | Handled error |
//! | 5002 | Validation error |

#![doc(html_root_url = "https://docs.rs/lambda-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use lambda_router_core as core;

// Re-export configuration types
pub use lambda_router_config as config;

// Re-export logging setup
pub use lambda_router_telemetry as telemetry;

// Re-export middleware types
pub use lambda_router_middleware as middleware;

// Re-export dispatch types
pub use lambda_router_dispatch as dispatch;

pub mod app;
pub mod routes;
pub mod storage;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use lambda_router::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{load_config, App, AppBuilder, AppError};

    pub use crate::storage::{ChaosPersonStore, MemoryPersonStore, Page, Person, PersonStore};

    pub use lambda_router_core::{
        AuditRecord, Envelope, InvocationContext, ProxyResponse, Request, ResponseCode,
        RouterError, RouterResult,
    };

    // Re-export DI types
    pub use lambda_router_core::di::Container;

    pub use lambda_router_config::{ConfigLoader, RouterConfig};

    pub use lambda_router_dispatch::{MethodReturn, Resource, Router};

    pub use lambda_router_middleware::stages::{AuditSink, MemoryAuditSink};
    pub use lambda_router_middleware::BoxFuture;
}
