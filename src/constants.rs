//! Application-wide constants and configuration defaults
//!
//! This module centralizes all magic numbers and configuration constants
//! to improve maintainability and make the codebase more configurable.

#![allow(dead_code)]

/// Default base URL of the upstream OpenLigaDB API
pub const DEFAULT_API_BASE_URL: &str = "https://api.openligadb.de";

/// Default provider identifier used when none is configured
pub const DEFAULT_PROVIDER: &str = "openliga";

/// User-Agent header sent on every upstream request
pub const USER_AGENT: &str = "sports-proxy/1.0";

/// Default timeout for a single upstream HTTP request in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: f64 = 10.0;

/// Default deadline for a whole logical call, including rate-limit waits,
/// all retry attempts and backoff sleeps, in seconds
pub const DEFAULT_CALL_DEADLINE_SECONDS: f64 = 60.0;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 100;

/// Candidate leagues scanned, in order, when resolving a team or match by id.
/// The upstream has no direct lookup endpoint, so GetTeam/GetMatch fall back
/// to fetching each league's matches and scanning linearly; first hit wins.
pub const CANDIDATE_LEAGUES: [&str; 5] = ["bl1", "bl2", "pl", "sa", "ll"];

/// Token bucket defaults for upstream admission control
pub mod rate_limit {
    /// Default refill rate in tokens per second
    pub const DEFAULT_RATE_PER_SECOND: f64 = 0.25;

    /// Default burst capacity (maximum stored tokens)
    pub const DEFAULT_BURST: u32 = 5;
}

/// Retry and backoff defaults for upstream calls
pub mod retry {
    /// Default maximum number of retry attempts after the initial call
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default base delay for exponential backoff (seconds)
    pub const DEFAULT_BACKOFF_BASE_SECONDS: f64 = 1.0;

    /// Default upper bound for a single backoff delay (seconds)
    pub const DEFAULT_BACKOFF_MAX_SECONDS: f64 = 30.0;

    /// Whether jitter is applied to backoff delays by default
    pub const DEFAULT_JITTER_ENABLED: bool = true;

    /// Fraction of the exponential delay used as the jitter range
    pub const JITTER_FRACTION: f64 = 0.1;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for upstream base URL override
    pub const API_BASE_URL: &str = "SPORTS_PROXY_API_BASE_URL";

    /// Environment variable for provider selection override
    pub const PROVIDER: &str = "SPORTS_PROXY_PROVIDER";

    /// Environment variable for rate limiter refill rate override
    pub const RATE_LIMIT_RPS: &str = "SPORTS_PROXY_RATE_LIMIT_RPS";

    /// Environment variable for rate limiter burst override
    pub const RATE_LIMIT_BURST: &str = "SPORTS_PROXY_RATE_LIMIT_BURST";

    /// Environment variable for maximum retry count override
    pub const MAX_RETRIES: &str = "SPORTS_PROXY_MAX_RETRIES";

    /// Environment variable for backoff base delay override (seconds)
    pub const BACKOFF_BASE_SECONDS: &str = "SPORTS_PROXY_BACKOFF_BASE_SECONDS";

    /// Environment variable for backoff max delay override (seconds)
    pub const BACKOFF_MAX_SECONDS: &str = "SPORTS_PROXY_BACKOFF_MAX_SECONDS";

    /// Environment variable for enabling/disabling backoff jitter
    pub const JITTER_ENABLED: &str = "SPORTS_PROXY_JITTER_ENABLED";

    /// Environment variable for per-request timeout override (seconds)
    pub const REQUEST_TIMEOUT_SECONDS: &str = "SPORTS_PROXY_REQUEST_TIMEOUT_SECONDS";

    /// Environment variable for whole-call deadline override (seconds)
    pub const CALL_DEADLINE_SECONDS: &str = "SPORTS_PROXY_CALL_DEADLINE_SECONDS";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "SPORTS_PROXY_LOG_FILE";
}
