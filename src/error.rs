use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Request-level errors, detected before any network activity
    #[error("Payload validation failed: {reason}")]
    Validation { field: String, reason: String },

    #[error("Unknown operationType: {operation}")]
    UnknownOperation { operation: String },

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("Call deadline exceeded: {message}")]
    DeadlineExceeded { message: String },

    #[error("Failed to fetch data from API: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Data integrity errors from the upstream, never retried
    #[error(
        "API returned HTML instead of JSON. Content-Type: {content_type}, URL: {url}, Response preview: {preview}"
    )]
    HtmlResponse {
        content_type: String,
        url: String,
        preview: String,
    },

    #[error("API returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("API returned empty or missing data: {message} (URL: {url})")]
    ApiNoData { message: String, url: String },

    // Business-level lookup failures from the fallback league scan
    #[error("Team not found: {team_id} (searched all candidate leagues)")]
    TeamNotFound { team_id: String },

    #[error("Match not found: {match_id} (searched all candidate leagues)")]
    MatchNotFound { match_id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a payload validation error naming the offending field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-operation error echoing the submitted name
    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a deadline exceeded error with context
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::DeadlineExceeded {
            message: message.into(),
        }
    }

    /// Create an HTML-instead-of-JSON error with a body preview
    pub fn html_response(
        content_type: impl Into<String>,
        url: impl Into<String>,
        preview: impl Into<String>,
    ) -> Self {
        Self::HtmlResponse {
            content_type: content_type.into(),
            url: url.into(),
            preview: preview.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a no data error
    pub fn api_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a team not found error
    pub fn team_not_found(team_id: impl Into<String>) -> Self {
        Self::TeamNotFound {
            team_id: team_id.into(),
        }
    }

    /// Create a match not found error
    pub fn match_not_found(match_id: impl Into<String>) -> Self {
        Self::MatchNotFound {
            match_id: match_id.into(),
        }
    }

    /// Check if error is retryable (network issues, server errors, rate limits)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiServiceUnavailable { .. }
                | AppError::ApiRateLimit { .. }
        )
    }

    /// Check if error indicates data not found (business logic, not technical error)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ApiNotFound { .. }
                | AppError::TeamNotFound { .. }
                | AppError::MatchNotFound { .. }
        )
    }

    /// Stable machine-readable error kind for the caller-facing contract.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::UnknownOperation { .. } => "unknown_operation",
            AppError::HtmlResponse { .. } => "content_type_error",
            AppError::ApiNotFound { .. }
            | AppError::ApiServerError { .. }
            | AppError::ApiClientError { .. }
            | AppError::ApiRateLimit { .. }
            | AppError::ApiServiceUnavailable { .. } => "upstream_http_error",
            AppError::NetworkTimeout { .. }
            | AppError::NetworkConnection { .. }
            | AppError::DeadlineExceeded { .. }
            | AppError::ApiFetch(_) => "upstream_network_error",
            AppError::ApiNoData { .. } => "empty_response_error",
            AppError::ApiMalformedJson { .. } | AppError::ApiParse(_) => "json_parse_error",
            AppError::TeamNotFound { .. } | AppError::MatchNotFound { .. } => "not_found",
            _ => "internal_error",
        }
    }

    /// Upstream HTTP status carried by this error, when one exists.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::ApiNotFound { .. } => Some(404),
            AppError::ApiRateLimit { .. } => Some(429),
            AppError::ApiServerError { status, .. }
            | AppError::ApiClientError { status, .. }
            | AppError::ApiServiceUnavailable { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport-level status the caller layer reports for this error.
    ///
    /// Request-shape problems map to 400, lookup misses to 404, upstream
    /// faults (HTTP, network, or structural) to 502, everything else to 500.
    pub fn transport_status(&self) -> u16 {
        match self {
            AppError::Validation { .. } | AppError::UnknownOperation { .. } => 400,
            AppError::ApiNotFound { .. }
            | AppError::TeamNotFound { .. }
            | AppError::MatchNotFound { .. } => 404,
            AppError::ApiServerError { .. }
            | AppError::ApiClientError { .. }
            | AppError::ApiRateLimit { .. }
            | AppError::ApiServiceUnavailable { .. }
            | AppError::NetworkTimeout { .. }
            | AppError::NetworkConnection { .. }
            | AppError::DeadlineExceeded { .. }
            | AppError::ApiFetch(_)
            | AppError::HtmlResponse { .. }
            | AppError::ApiMalformedJson { .. }
            | AppError::ApiNoData { .. } => 502,
            _ => 500,
        }
    }
}
