use crate::constants;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration for the proxy process: upstream location, rate limiting,
/// retry behavior and logging. Loaded once at startup; the provider and
/// rate limiter built from it are shared by all requests for the process
/// lifetime.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Provider identifier. Only "openliga" is currently known; the factory
    /// fails fast on anything else.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL of the upstream data API. Should include the https:// prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Timeout for a single upstream HTTP request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: f64,
    /// Deadline for a whole logical call including rate-limit waits, retries
    /// and backoff sleeps, in seconds.
    #[serde(default = "default_call_deadline")]
    pub call_deadline_seconds: f64,
    /// Token bucket refill rate in tokens per second.
    #[serde(default = "default_rate_limit_rps")]
    pub rate_limit_rps: f64,
    /// Token bucket burst capacity.
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: u32,
    /// Maximum number of retry attempts after the initial upstream call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries, in seconds.
    #[serde(default = "default_backoff_base")]
    pub backoff_base_seconds: f64,
    /// Upper bound for a single backoff delay, in seconds.
    #[serde(default = "default_backoff_max")]
    pub backoff_max_seconds: f64,
    /// Whether a random jitter is added to backoff delays.
    #[serde(default = "default_jitter_enabled")]
    pub jitter_enabled: bool,
    /// Path to the log file. If not specified, logs go to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_provider() -> String {
    constants::DEFAULT_PROVIDER.to_string()
}

fn default_api_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> f64 {
    constants::DEFAULT_REQUEST_TIMEOUT_SECONDS
}

fn default_call_deadline() -> f64 {
    constants::DEFAULT_CALL_DEADLINE_SECONDS
}

fn default_rate_limit_rps() -> f64 {
    constants::rate_limit::DEFAULT_RATE_PER_SECOND
}

fn default_rate_limit_burst() -> u32 {
    constants::rate_limit::DEFAULT_BURST
}

fn default_max_retries() -> u32 {
    constants::retry::DEFAULT_MAX_RETRIES
}

fn default_backoff_base() -> f64 {
    constants::retry::DEFAULT_BACKOFF_BASE_SECONDS
}

fn default_backoff_max() -> f64 {
    constants::retry::DEFAULT_BACKOFF_MAX_SECONDS
}

fn default_jitter_enabled() -> bool {
    constants::retry::DEFAULT_JITTER_ENABLED
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: default_provider(),
            api_base_url: default_api_base_url(),
            request_timeout_seconds: default_request_timeout(),
            call_deadline_seconds: default_call_deadline(),
            rate_limit_rps: default_rate_limit_rps(),
            rate_limit_burst: default_rate_limit_burst(),
            max_retries: default_max_retries(),
            backoff_base_seconds: default_backoff_base(),
            backoff_max_seconds: default_backoff_max(),
            jitter_enabled: default_jitter_enabled(),
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, built-in defaults are used.
    /// Environment variables override config file values.
    ///
    /// # Environment Variables
    /// Every field has a `SPORTS_PROXY_`-prefixed override; see
    /// `constants::env_vars`. Unparseable values are ignored.
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        use constants::env_vars;

        if let Ok(base_url) = std::env::var(env_vars::API_BASE_URL) {
            self.api_base_url = base_url;
        }

        if let Ok(provider) = std::env::var(env_vars::PROVIDER) {
            self.provider = provider.to_lowercase();
        }

        if let Some(rps) = parse_env::<f64>(env_vars::RATE_LIMIT_RPS) {
            self.rate_limit_rps = rps;
        }

        if let Some(burst) = parse_env::<u32>(env_vars::RATE_LIMIT_BURST) {
            self.rate_limit_burst = burst;
        }

        if let Some(max_retries) = parse_env::<u32>(env_vars::MAX_RETRIES) {
            self.max_retries = max_retries;
        }

        if let Some(base) = parse_env::<f64>(env_vars::BACKOFF_BASE_SECONDS) {
            self.backoff_base_seconds = base;
        }

        if let Some(max) = parse_env::<f64>(env_vars::BACKOFF_MAX_SECONDS) {
            self.backoff_max_seconds = max;
        }

        if let Ok(jitter) = std::env::var(env_vars::JITTER_ENABLED) {
            self.jitter_enabled = jitter.to_lowercase() == "true" || jitter == "1";
        }

        if let Some(timeout) = parse_env::<f64>(env_vars::REQUEST_TIMEOUT_SECONDS) {
            self.request_timeout_seconds = timeout;
        }

        if let Some(deadline) = parse_env::<f64>(env_vars::CALL_DEADLINE_SECONDS) {
            self.call_deadline_seconds = deadline;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("Provider:");
            println!("{}", config.provider);
            println!("────────────────────────────────────");
            println!("Upstream Base URL:");
            println!("{}", config.api_base_url);
            println!("────────────────────────────────────");
            println!("Rate Limit:");
            println!(
                "{} tokens/s, burst {}",
                config.rate_limit_rps, config.rate_limit_burst
            );
            println!("────────────────────────────────────");
            println!("Retries:");
            println!(
                "max {}, backoff {}s..{}s, jitter {}",
                config.max_retries,
                config.backoff_base_seconds,
                config.backoff_max_seconds,
                if config.jitter_enabled { "on" } else { "off" }
            );
            println!("────────────────────────────────────");
            println!("Timeouts:");
            println!(
                "request {}s, call deadline {}s",
                config.request_timeout_seconds, config.call_deadline_seconds
            );
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/sports_proxy.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
            println!("Built-in defaults are in effect.");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent
    /// directory if it doesn't exist.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path (for testing).
    #[allow(dead_code)] // Used in tests
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse::<T>().ok())
}
