//! Rate-limited, retrying HTTP adapter for the upstream API

use crate::config::Config;
use crate::constants;
use crate::error::AppError;
use crate::provider::rate_limit::TokenBucket;
use crate::provider::retry::RetryPolicy;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, warn};

/// HTTP adapter that funnels every upstream call through the shared token
/// bucket and a bounded exponential-backoff retry loop.
///
/// One instance is created at process start and shared by all requests; it
/// owns the connection pool, which is released when the instance is dropped.
pub struct UpstreamClient {
    client: Client,
    limiter: TokenBucket,
    retry: RetryPolicy,
    call_deadline: Duration,
}

impl UpstreamClient {
    /// Builds the adapter from configuration: pooled client with JSON accept
    /// headers, compressed encodings and redirect following, plus the shared
    /// rate limiter and retry policy.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs_f64(config.request_timeout_seconds))
            .user_agent(constants::USER_AGENT)
            .default_headers(headers)
            .pool_max_idle_per_host(constants::HTTP_POOL_MAX_IDLE_PER_HOST)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(UpstreamClient {
            client,
            limiter: TokenBucket::new(config.rate_limit_rps, config.rate_limit_burst),
            retry: RetryPolicy::from_config(config),
            call_deadline: Duration::from_secs_f64(config.call_deadline_seconds),
        })
    }

    /// Issues an HTTP request with rate limiting and retry on transient
    /// failures.
    ///
    /// Statuses below 500 other than 429 are returned as-is on the first
    /// attempt, including client errors; 429 and 5xx are retried with
    /// backoff and the last response is returned unmodified once the retry
    /// budget is spent, leaving classification to the caller. Timeouts and
    /// connection faults are retried the same way and propagated after
    /// exhaustion. A 200 response carrying HTML is a data-integrity fault
    /// and fails immediately without retry.
    ///
    /// The whole call, including rate-limit waits and backoff sleeps, is
    /// bounded by the configured call deadline.
    pub async fn request_with_retry(
        &self,
        method: Method,
        url: &str,
    ) -> Result<Response, AppError> {
        let deadline = Instant::now() + self.call_deadline;
        let max_retries = self.retry.max_retries;
        let mut attempt: u32 = 0;

        loop {
            self.limiter.acquire(Some(deadline)).await?;

            let request = self.client.request(method.clone(), url).send();
            let outcome = match timeout_at(deadline, request).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Err(AppError::deadline_exceeded(format!(
                        "in-flight request overran the call deadline (URL: {url})"
                    )));
                }
            };

            match outcome {
                Ok(response) => {
                    let status = response.status();

                    let content_type = response
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(|value| value.to_lowercase())
                        .unwrap_or_default();
                    if status == StatusCode::OK && content_type.contains("text/html") {
                        let preview: String = response
                            .text()
                            .await
                            .unwrap_or_default()
                            .chars()
                            .take(300)
                            .collect();
                        return Err(AppError::html_response(content_type, url, preview));
                    }

                    if status.as_u16() < 500 && status != StatusCode::TOO_MANY_REQUESTS {
                        return Ok(response);
                    }

                    if attempt >= max_retries {
                        debug!(
                            "Retries exhausted with status {} from {}, returning last response",
                            status, url
                        );
                        return Ok(response);
                    }

                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "Transient {} from {}. Retrying in {:?} (attempt {}/{})",
                        status,
                        url,
                        delay,
                        attempt + 1,
                        max_retries
                    );
                    self.backoff_sleep(delay, deadline, url).await?;
                    attempt += 1;
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < max_retries {
                        let delay = self.retry.delay_for(attempt);
                        warn!(
                            "Request error {} for {}. Retrying in {:?} (attempt {}/{})",
                            e,
                            url,
                            delay,
                            attempt + 1,
                            max_retries
                        );
                        self.backoff_sleep(delay, deadline, url).await?;
                        attempt += 1;
                        continue;
                    }
                    return Err(if e.is_timeout() {
                        AppError::network_timeout(url)
                    } else if e.is_connect() {
                        AppError::network_connection(url, e.to_string())
                    } else {
                        AppError::ApiFetch(e)
                    });
                }
            }
        }
    }

    async fn backoff_sleep(
        &self,
        delay: Duration,
        deadline: Instant,
        url: &str,
    ) -> Result<(), AppError> {
        if Instant::now() + delay > deadline {
            return Err(AppError::deadline_exceeded(format!(
                "backoff of {delay:?} would overrun the call deadline (URL: {url})"
            )));
        }
        sleep(delay).await;
        Ok(())
    }
}
