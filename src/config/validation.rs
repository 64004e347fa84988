use crate::config::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Upstream base URL cannot be empty and must carry an http(s) scheme
/// - Provider identifier cannot be empty
/// - Rate limiter refill rate must be positive; burst must be at least 1
/// - Retry backoff base cannot exceed the backoff maximum
/// - Request timeout and call deadline must be positive, and the deadline
///   must not be shorter than a single request timeout
/// - If a log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.api_base_url.is_empty() {
        return Err(AppError::config_error("Upstream base URL cannot be empty"));
    }

    if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://") {
        return Err(AppError::config_error(
            "Upstream base URL must start with http:// or https://",
        ));
    }

    if config.provider.is_empty() {
        return Err(AppError::config_error("Provider cannot be empty"));
    }

    if config.rate_limit_rps <= 0.0 || !config.rate_limit_rps.is_finite() {
        return Err(AppError::config_error(
            "Rate limit refill rate must be a positive number of tokens per second",
        ));
    }

    if config.rate_limit_burst < 1 {
        return Err(AppError::config_error(
            "Rate limit burst must be at least 1",
        ));
    }

    if config.backoff_base_seconds < 0.0 || !config.backoff_base_seconds.is_finite() {
        return Err(AppError::config_error(
            "Backoff base delay cannot be negative",
        ));
    }

    if config.backoff_max_seconds < config.backoff_base_seconds {
        return Err(AppError::config_error(
            "Backoff max delay cannot be smaller than the base delay",
        ));
    }

    if config.request_timeout_seconds <= 0.0 || !config.request_timeout_seconds.is_finite() {
        return Err(AppError::config_error(
            "Request timeout must be a positive number of seconds",
        ));
    }

    if config.call_deadline_seconds < config.request_timeout_seconds {
        return Err(AppError::config_error(
            "Call deadline cannot be shorter than a single request timeout",
        ));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
