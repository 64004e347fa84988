//! Upstream provider capability set, its OpenLigaDB implementation and the
//! rate-limited adapter stack underneath it

use crate::config::Config;
use crate::error::AppError;
use serde_json::Value;

pub mod adapter;
pub mod openliga;
pub mod rate_limit;
pub mod retry;
pub mod urls;

pub use adapter::UpstreamClient;
pub use openliga::OpenLigaProvider;
pub use rate_limit::TokenBucket;
pub use retry::RetryPolicy;

/// Capability set offered by a sports data provider.
///
/// All operations return raw parsed JSON; normalization into stable response
/// shapes happens in the dispatch layer.
#[allow(async_fn_in_trait)]
pub trait SportsProvider {
    /// Human-readable provider name used in audit events
    fn name(&self) -> &'static str;

    /// List all available leagues
    async fn list_leagues(&self) -> Result<Value, AppError>;

    /// Get the matches of a specific league
    async fn get_league_matches(&self, league_id: &str) -> Result<Value, AppError>;

    /// Get team information by id
    async fn get_team(&self, team_id: &str) -> Result<Value, AppError>;

    /// Get match information by id
    async fn get_match(&self, match_id: &str) -> Result<Value, AppError>;
}

/// Known provider identifiers, parsed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenLiga,
}

impl ProviderKind {
    /// Parses a configured provider name; fails fast on anything unknown.
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        match name.to_lowercase().as_str() {
            "openliga" => Ok(ProviderKind::OpenLiga),
            other => Err(AppError::config_error(format!(
                "Unknown provider: {other}. Available providers: openliga"
            ))),
        }
    }
}

/// Builds the configured provider.
///
/// There is a single concrete implementation today; the factory still goes
/// through `ProviderKind` so an unrecognized configuration value fails at
/// startup instead of at first request.
pub fn create_provider(config: &Config) -> Result<OpenLigaProvider, AppError> {
    match ProviderKind::from_name(&config.provider)? {
        ProviderKind::OpenLiga => OpenLigaProvider::new(config),
    }
}
