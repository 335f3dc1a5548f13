//! Route registry and resource dispatch for lambda-router.
//!
//! Business logic lives in [`Resource`] implementations registered on a
//! [`Router`] at startup. The [`RouteDispatcher`] plugs the registry into the
//! middleware pipeline as its dispatch step.
//!
//! # Matching
//!
//! - Exact path match first (`/v1/ping`)
//! - Otherwise the longest registered prefix ending on a `/` boundary
//!   (`/v1/person` serves `/v1/person/42` but not `/v1/personal`)
//! - No match is an unclassified failure
//!
//! # Example
//!
//! ```rust
//! use lambda_router_dispatch::{MethodReturn, Resource, RouteDispatcher, Router};
//! use lambda_router_core::{di::Container, AuditRecord, Request, RouterResult};
//! use lambda_router_middleware::BoxFuture;
//! use std::sync::Arc;
//!
//! struct Ping;
//!
//! impl Resource for Ping {
//!     fn get<'a>(
//!         &'a self,
//!         _request: &'a Request,
//!         _audit: &'a AuditRecord,
//!     ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
//!         Box::pin(async { Ok(MethodReturn::new("pong")) })
//!     }
//! }
//!
//! let mut router = Router::new();
//! router.insert_shared("/v1/ping", Arc::new(Ping));
//!
//! let dispatcher = RouteDispatcher::new(Arc::new(router), Arc::new(Container::new()));
//! assert_eq!(dispatcher.router().len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/lambda-router-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;
mod resource;
mod router;

pub use dispatcher::RouteDispatcher;
pub use resource::{invoke, method_not_supported, MethodReturn, Resource};
pub use router::{HandlerFactory, RouteMatch, Router};
