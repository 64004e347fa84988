//! Request and response envelope models shared with the caller layer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Inbound proxy request: an operation name plus a flat string payload.
/// Each operation interprets only the keys it declares required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyRequest {
    #[serde(rename = "operationType")]
    pub operation_type: String,
    #[serde(default)]
    pub payload: HashMap<String, String>,
}

/// Success envelope returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyResponse {
    pub success: bool,
    pub data: NormalizedResult,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error envelope returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Stable, operation-specific response shapes.
///
/// Always well-formed regardless of upstream payload irregularities:
/// normalization substitutes empty containers for malformed shapes, so the
/// caller-facing contract never breaks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResult {
    Leagues {
        leagues: Vec<Value>,
        count: usize,
    },
    Matches {
        matches: Vec<Value>,
        count: usize,
    },
    Team {
        team: Map<String, Value>,
    },
    Match {
        #[serde(rename = "match")]
        match_data: Map<String, Value>,
    },
}
