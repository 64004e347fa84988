//! Operation registry: validate/execute/normalize dispatch for proxy calls

use crate::error::AppError;
use crate::models::NormalizedResult;
use crate::provider::SportsProvider;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Flat string payload attached to a proxy request.
pub type Payload = HashMap<String, String>;

/// The closed set of supported operations.
///
/// Each case carries its own validation rule, provider capability and
/// normalization. The set is fixed at compile time; there is no runtime
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListLeagues,
    GetLeagueMatches,
    GetTeam,
    GetMatch,
}

impl Operation {
    /// All registered operations, in a stable order.
    pub const ALL: [Operation; 4] = [
        Operation::ListLeagues,
        Operation::GetLeagueMatches,
        Operation::GetTeam,
        Operation::GetMatch,
    ];

    /// Resolves an operation name; unregistered names fail with
    /// `UnknownOperation` echoing the submitted name.
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        match name {
            "ListLeagues" => Ok(Operation::ListLeagues),
            "GetLeagueMatches" => Ok(Operation::GetLeagueMatches),
            "GetTeam" => Ok(Operation::GetTeam),
            "GetMatch" => Ok(Operation::GetMatch),
            other => Err(AppError::unknown_operation(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListLeagues => "ListLeagues",
            Operation::GetLeagueMatches => "GetLeagueMatches",
            Operation::GetTeam => "GetTeam",
            Operation::GetMatch => "GetMatch",
        }
    }

    /// Synchronous, pure payload validation. No side effects and no network
    /// activity; failures name the missing field.
    pub fn validate(&self, payload: &Payload) -> Result<(), AppError> {
        match self {
            Operation::ListLeagues => Ok(()),
            Operation::GetLeagueMatches => required_field(payload, "leagueId").map(|_| ()),
            Operation::GetTeam => required_field(payload, "teamId").map(|_| ()),
            Operation::GetMatch => required_field(payload, "matchId").map(|_| ()),
        }
    }

    /// Executes the operation against the provider. May suspend on network
    /// I/O and fail with provider-level errors.
    pub async fn execute<P: SportsProvider>(
        &self,
        provider: &P,
        payload: &Payload,
    ) -> Result<Value, AppError> {
        match self {
            Operation::ListLeagues => provider.list_leagues().await,
            Operation::GetLeagueMatches => {
                provider
                    .get_league_matches(required_field(payload, "leagueId")?)
                    .await
            }
            Operation::GetTeam => provider.get_team(required_field(payload, "teamId")?).await,
            Operation::GetMatch => provider.get_match(required_field(payload, "matchId")?).await,
        }
    }

    /// Total normalization of a raw provider result into the stable response
    /// shape for this operation. Never fails: unexpected shapes become empty
    /// containers.
    pub fn normalize(&self, raw: Value) -> NormalizedResult {
        match self {
            Operation::ListLeagues => {
                let leagues = as_array_or_empty(raw);
                NormalizedResult::Leagues {
                    count: leagues.len(),
                    leagues,
                }
            }
            Operation::GetLeagueMatches => {
                let matches = as_array_or_empty(raw);
                NormalizedResult::Matches {
                    count: matches.len(),
                    matches,
                }
            }
            Operation::GetTeam => NormalizedResult::Team {
                team: as_object_or_empty(raw),
            },
            Operation::GetMatch => NormalizedResult::Match {
                match_data: as_object_or_empty(raw),
            },
        }
    }
}

fn as_array_or_empty(raw: Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn as_object_or_empty(raw: Value) -> Map<String, Value> {
    match raw {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Looks up a required non-empty payload field, failing with the exact
/// "{field} is required" reason the caller contract specifies.
fn required_field<'a>(payload: &'a Payload, field: &'static str) -> Result<&'a str, AppError> {
    match payload.get(field) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::validation(field, format!("{field} is required"))),
    }
}

/// Registry owning the provider and orchestrating a single call:
/// validate, then execute, then normalize.
///
/// Constructed once at process start with the provider injected; the mapping
/// of names to operations is immutable afterwards.
pub struct OperationRegistry<P> {
    provider: P,
}

impl<P: SportsProvider> OperationRegistry<P> {
    pub fn new(provider: P) -> Self {
        OperationRegistry { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolves an operation name, failing with `UnknownOperation`.
    pub fn get_operation(&self, operation_type: &str) -> Result<Operation, AppError> {
        Operation::from_name(operation_type)
    }

    /// Runs the full pipeline for one request.
    pub async fn dispatch(
        &self,
        operation_type: &str,
        payload: &Payload,
    ) -> Result<NormalizedResult, AppError> {
        let operation = self.get_operation(operation_type)?;
        operation.validate(payload)?;
        let raw = operation.execute(&self.provider, payload).await?;
        Ok(operation.normalize(raw))
    }
}
