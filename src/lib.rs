//! Operation dispatch and rate-limited upstream adapter for the OpenLigaDB
//! sports data API.
//!
//! The core maps an abstract operation name to a validate/execute/normalize
//! triple and executes the upstream call through a shared token-bucket rate
//! limiter with bounded exponential-backoff retries. Team and match lookups
//! fall back to a linear scan over candidate leagues because the upstream
//! offers no direct lookup endpoints.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sports_proxy::config::Config;
//! use sports_proxy::dispatch::{OperationRegistry, Payload};
//! use sports_proxy::error::AppError;
//! use sports_proxy::provider::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let provider = create_provider(&config)?;
//!     let registry = OperationRegistry::new(provider);
//!
//!     let mut payload = Payload::new();
//!     payload.insert("leagueId".to_string(), "bl1".to_string());
//!     let result = registry.dispatch("GetLeagueMatches", &payload).await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod provider;

// Re-export commonly used types for convenience
pub use config::Config;
pub use dispatch::{Operation, OperationRegistry, Payload};
pub use error::AppError;
pub use models::{ErrorResponse, NormalizedResult, ProxyRequest, ProxyResponse};
pub use provider::{OpenLigaProvider, SportsProvider, create_provider};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
