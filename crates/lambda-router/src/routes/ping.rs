//! `GET /v1/ping` health check.

use lambda_router_core::{AuditRecord, Request, RouterResult};
use lambda_router_dispatch::{MethodReturn, Resource};
use lambda_router_middleware::BoxFuture;

/// Answers `"pong"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ping;

impl Resource for Ping {
    fn get<'a>(
        &'a self,
        _request: &'a Request,
        _audit: &'a AuditRecord,
    ) -> BoxFuture<'a, RouterResult<MethodReturn>> {
        Box::pin(async { Ok(MethodReturn::new("pong")) })
    }
}
