//! Exponential backoff schedule for upstream retries

use crate::config::Config;
use crate::constants;
use rand::Rng;
use std::time::Duration;

/// Bounded exponential backoff with optional jitter.
///
/// Attempt numbering is zero-based: `delay_for(0)` is the sleep before the
/// first retry. Retries are bounded by `max_retries`; there is no unbounded
/// retry path.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub jitter_enabled: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: constants::retry::DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_secs_f64(constants::retry::DEFAULT_BACKOFF_BASE_SECONDS),
            backoff_max: Duration::from_secs_f64(constants::retry::DEFAULT_BACKOFF_MAX_SECONDS),
            jitter_enabled: constants::retry::DEFAULT_JITTER_ENABLED,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        RetryPolicy {
            max_retries: config.max_retries,
            backoff_base: Duration::from_secs_f64(config.backoff_base_seconds),
            backoff_max: Duration::from_secs_f64(config.backoff_max_seconds),
            jitter_enabled: config.jitter_enabled,
        }
    }

    /// Backoff delay before retry `attempt`:
    /// `min(base * 2^attempt + jitter, max)` where jitter is drawn uniformly
    /// from `[0, base * 2^attempt / 10]` when enabled.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        // Clamp the exponent so the pre-jitter delay stays finite
        let exponential =
            self.backoff_base.as_secs_f64() * 2f64.powi(attempt.min(31) as i32);
        let jittered = if self.jitter_enabled {
            let jitter_max = exponential * constants::retry::JITTER_FRACTION;
            exponential + rand::rng().random_range(0.0..=jitter_max)
        } else {
            exponential
        };
        Duration::from_secs_f64(jittered.min(self.backoff_max.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(base: f64, max: f64, jitter: bool) -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            backoff_base: Duration::from_secs_f64(base),
            backoff_max: Duration::from_secs_f64(max),
            jitter_enabled: jitter,
        }
    }

    #[test]
    fn test_delays_double_without_jitter() {
        let policy = policy(1.0, 30.0, false);
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
    }

    #[test]
    fn test_delays_are_non_decreasing_and_bounded() {
        let policy = policy(0.5, 10.0, false);
        let mut previous = Duration::ZERO;
        for attempt in 0..12 {
            let delay = policy.delay_for(attempt);
            assert!(
                delay >= previous,
                "delay decreased at attempt {attempt}: {delay:?} < {previous:?}"
            );
            assert!(delay <= Duration::from_secs(10));
            previous = delay;
        }
    }

    #[test]
    fn test_cap_applies_before_schedule_runs_away() {
        let policy = policy(1.0, 5.0, false);
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(5));
        assert_eq!(policy.delay_for(30), Duration::from_secs(5));
        // Large attempt numbers must not overflow into nonsense
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let policy = policy(1.0, 30.0, true);
        for attempt in 0..4 {
            let exponential = 2f64.powi(attempt as i32);
            for _ in 0..50 {
                let delay = policy.delay_for(attempt).as_secs_f64();
                assert!(
                    delay >= exponential && delay <= exponential * 1.1 + 1e-9,
                    "attempt {attempt}: delay {delay} outside [{exponential}, {}]",
                    exponential * 1.1
                );
            }
        }
    }

    #[test]
    fn test_jittered_delay_respects_cap() {
        let policy = policy(1.0, 4.0, true);
        for _ in 0..50 {
            assert!(policy.delay_for(5) <= Duration::from_secs(4));
        }
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            max_retries: 7,
            backoff_base_seconds: 0.25,
            backoff_max_seconds: 12.0,
            jitter_enabled: false,
            ..Default::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_retries, 7);
        assert_eq!(policy.backoff_base, Duration::from_millis(250));
        assert_eq!(policy.backoff_max, Duration::from_secs(12));
        assert!(!policy.jitter_enabled);
    }
}
