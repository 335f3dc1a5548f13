//! Audit records.
//!
//! One [`AuditRecord`] is created per invocation, enriched as the invocation
//! progresses and emitted once when it completes.

use crate::error::RouterError;
use crate::response::ResponseCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp layout used in audit records and stored entities.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Formats a UTC instant as `YYYY-MM-DD HH:MM:SS.mmm`.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Returns the current UTC time as `YYYY-MM-DD HH:MM:SS.mmm`.
#[must_use]
pub fn utc_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Service stamps copied into every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInfo {
    /// Deployment environment (`dev`, `prod`, ...).
    pub environment: String,
    /// Release version.
    pub version: String,
    /// Build identifier.
    pub build: String,
}

/// The audit trail entry for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Record id (UUID v7).
    pub id: String,
    /// Trace id of the invocation.
    pub trace_id: String,
    /// Record type, always `"api"` for API invocations.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Logical service name.
    pub origin: String,
    /// Normalized request path.
    pub origin_path: Option<String>,
    /// Free-form metadata; the HTTP method for API invocations.
    pub meta: Option<String>,
    /// UTC start time.
    pub start_time: String,
    /// Milliseconds consumed out of the configured timeout.
    pub run_time: Option<u64>,
    /// `true` on success, `false` on failure, unset while running.
    pub status: Option<bool>,
    /// Final [`ResponseCode`] value.
    pub status_code: Option<u16>,
    /// Raw failure message.
    pub status_description: Option<String>,
    /// Whether the failure should page someone.
    pub raise_alarm: bool,
    /// Deployment environment.
    pub environment: String,
    /// Release version.
    pub version: String,
    /// Build identifier.
    pub build: String,
}

impl AuditRecord {
    /// Record type for API invocations.
    pub const API: &'static str = "api";

    /// Starts a new API record stamped with the current UTC time.
    #[must_use]
    pub fn start(
        trace_id: impl Into<String>,
        origin: impl Into<String>,
        deployment: &DeploymentInfo,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            trace_id: trace_id.into(),
            record_type: Self::API.to_string(),
            origin: origin.into(),
            origin_path: None,
            meta: None,
            start_time: utc_timestamp(),
            run_time: None,
            status: None,
            status_code: None,
            status_description: None,
            raise_alarm: false,
            environment: deployment.environment.clone(),
            version: deployment.version.clone(),
            build: deployment.build.clone(),
        }
    }

    /// Stamps the success outcome.
    pub fn record_success(&mut self) {
        self.status = Some(true);
        self.status_code = Some(ResponseCode::Success.as_u16());
    }

    /// Stamps the failure outcome for `error`.
    pub fn record_failure(&mut self, error: &RouterError) {
        self.status = Some(false);
        self.raise_alarm = true;
        self.status_description = Some(error.message().to_string());
        self.status_code = Some(error.response_code().as_u16());
    }

    /// Returns `true` once an outcome has been stamped.
    #[must_use]
    pub const fn has_outcome(&self) -> bool {
        self.status_code.is_some()
    }
}
