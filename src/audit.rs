//! Structured audit logging for request tracking
//!
//! Every proxy request produces a small number of audit events: one after
//! validation, one for the final outcome. Events are serialized as single
//! JSON lines with camelCase keys and emitted through the `audit` tracing
//! target so they can be filtered and routed independently of diagnostics.

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of payload validation recorded in an audit event.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub pass: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
}

/// One structured audit record for a proxy request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub request_id: String,
    pub timestamp: String,
    pub operation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_outcome: Option<ValidationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    pub fn new(request_id: &str, operation_type: &str) -> Self {
        AuditEvent {
            request_id: request_id.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            operation_type: operation_type.to_string(),
            validation_outcome: None,
            provider: None,
            target_url: None,
            upstream_status_code: None,
            latency_ms: None,
            final_outcome: None,
            error: None,
        }
    }

    pub fn validation(mut self, pass: bool, reasons: Option<Vec<String>>) -> Self {
        self.validation_outcome = Some(ValidationOutcome { pass, reasons });
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    pub fn upstream_status(mut self, status: u16) -> Self {
        self.upstream_status_code = Some(status);
        self
    }

    /// Records the latency in milliseconds, rounded to two decimals.
    pub fn latency(mut self, latency: Duration) -> Self {
        let millis = latency.as_secs_f64() * 1000.0;
        self.latency_ms = Some((millis * 100.0).round() / 100.0);
        self
    }

    pub fn outcome(mut self, outcome: impl Into<String>) -> Self {
        self.final_outcome = Some(outcome.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Emits the event as a single JSON line on the `audit` target.
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(line) => info!(target: "audit", "{line}"),
            Err(e) => warn!("Failed to serialize audit event: {e}"),
        }
    }
}

/// Generates a random 128-bit request id rendered as 32 hex characters.
pub fn new_request_id() -> String {
    format!("{:032x}", rand::rng().random::<u128>())
}
