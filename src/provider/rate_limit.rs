//! Token bucket admission gate shared by all outbound upstream calls

use crate::error::AppError;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Shared token bucket rate limiter.
///
/// One instance gates every outbound upstream call in the process. The whole
/// refill/consume/wait sequence runs under a single async mutex that is held
/// across the wait, so concurrent callers can never interleave updates or
/// admit more than the burst capacity.
pub struct TokenBucket {
    /// Refill rate in tokens per second
    rate: f64,
    /// Maximum stored tokens
    burst: f64,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a bucket that starts full: `burst` calls are admitted
    /// immediately, after which admission settles to `rate` tokens per second.
    pub fn new(rate: f64, burst: u32) -> Self {
        TokenBucket {
            rate,
            burst: f64::from(burst),
            state: Mutex::new(BucketState {
                tokens: f64::from(burst),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Acquire a token, sleeping until one is available.
    ///
    /// Tokens refill continuously at the configured rate, capped at the burst
    /// capacity. When the bucket holds less than one token the caller sleeps
    /// for `(1 - tokens) / rate`; on wakeup the bucket is reset to zero
    /// tokens. The fractional refill earned during the wait is not credited
    /// back, so the bucket under-admits slightly after any wait (pinned by a
    /// regression test below).
    ///
    /// When a `deadline` is given and the computed wait would overrun it,
    /// `DeadlineExceeded` is returned without sleeping or consuming a token.
    pub async fn acquire(&self, deadline: Option<Instant>) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.burst);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            return Ok(());
        }

        let wait = Duration::from_secs_f64((1.0 - state.tokens) / self.rate);
        if let Some(deadline) = deadline
            && now + wait > deadline
        {
            return Err(AppError::deadline_exceeded(format!(
                "rate limiter wait of {wait:?} would overrun the call deadline"
            )));
        }

        // Lock stays held across the sleep; waiting callers queue behind it
        sleep(wait).await;
        state.tokens = 0.0;
        state.last_refill = Instant::now();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn stored_tokens(&self) -> f64 {
        self.state.lock().await.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_admitted_without_waiting() {
        let bucket = TokenBucket::new(10.0, 2);

        let start = Instant::now();
        bucket.acquire(None).await.unwrap();
        bucket.acquire(None).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_bucket_waits_for_refill() {
        // rate=10, burst=2: after draining the burst the third caller waits
        // (1 - 0) / 10 = 100ms
        let bucket = TokenBucket::new(10.0, 2);
        bucket.acquire(None).await.unwrap();
        bucket.acquire(None).await.unwrap();

        let start = Instant::now();
        bucket.acquire(None).await.unwrap();
        let waited = start.elapsed();
        assert!(
            waited >= Duration::from_millis(95) && waited <= Duration::from_millis(150),
            "expected ~100ms wait, got {waited:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_never_exceed_burst() {
        let bucket = TokenBucket::new(10.0, 2);

        // Long idle period refills far more than the burst would hold
        tokio::time::advance(Duration::from_secs(100)).await;
        bucket.acquire(None).await.unwrap();

        let tokens = bucket.stored_tokens().await;
        assert!(tokens <= 2.0, "tokens exceeded burst: {tokens}");
        assert!(tokens >= 0.0, "tokens went negative: {tokens}");
        // Capped at burst, then one consumed
        assert!((tokens - 1.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokens_never_go_negative() {
        let bucket = TokenBucket::new(5.0, 1);
        for _ in 0..4 {
            bucket.acquire(None).await.unwrap();
            let tokens = bucket.stored_tokens().await;
            assert!(tokens >= 0.0, "tokens went negative: {tokens}");
            assert!(tokens <= 1.0, "tokens exceeded burst: {tokens}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_wait_reset_leaves_bucket_empty() {
        // The fractional token earned during the wait is deliberately not
        // credited back. This under-admits relative to the nominal rate and
        // is pinned here so a change to it is a conscious decision.
        let bucket = TokenBucket::new(1.0, 1);
        bucket.acquire(None).await.unwrap();

        let start = Instant::now();
        bucket.acquire(None).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(990));
        assert_eq!(bucket.stored_tokens().await, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_rejects_unaffordable_wait() {
        let bucket = TokenBucket::new(1.0, 1);
        bucket.acquire(None).await.unwrap();

        // Refill of one token takes 1s, deadline only allows 100ms
        let deadline = Instant::now() + Duration::from_millis(100);
        let start = Instant::now();
        let result = bucket.acquire(Some(deadline)).await;
        assert!(matches!(result, Err(AppError::DeadlineExceeded { .. })));
        // Rejection is immediate, no partial wait
        assert_eq!(start.elapsed(), Duration::ZERO);

        // A generous deadline admits normally
        let deadline = Instant::now() + Duration::from_secs(5);
        bucket.acquire(Some(deadline)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquires_are_serialized() {
        let bucket = Arc::new(TokenBucket::new(10.0, 1));

        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..3 {
            let bucket = Arc::clone(&bucket);
            handles.push(tokio::spawn(async move {
                bucket.acquire(None).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // First caller takes the burst token; the two others wait 100ms each
        // behind the lock.
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(190),
            "expected at least ~200ms of serialized waits, got {elapsed:?}"
        );

        let tokens = bucket.stored_tokens().await;
        assert!((0.0..=1.0).contains(&tokens));
    }
}
