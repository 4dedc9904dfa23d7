//! Retry Policy
//!
//! Exponential backoff with jitter for retrying transient provider
//! failures. Attempts are counted including the first call.

use std::time::Duration;

use rand::Rng;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff (2.0 doubles each retry).
    pub multiplier: f64,
    /// Jitter factor as a fraction (0.1 = ±10 % randomization).
    pub jitter_factor: f64,
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            multiplier: 2.0,
            jitter_factor: 0.1,
            max_attempts: 3,
        }
    }
}

/// Backoff state for one logical operation.
#[derive(Debug)]
pub struct RetryPolicy {
    config: RetryConfig,
    current_delay: Duration,
    attempts: u32,
}

impl RetryPolicy {
    /// Start a new operation.
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        let initial_delay = config.initial_delay;
        Self {
            config,
            current_delay: initial_delay,
            attempts: 0,
        }
    }

    /// Register an attempt about to be made.
    pub const fn begin_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Attempts made so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted.
    #[must_use]
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.config.max_attempts.max(1) {
            return None;
        }

        let delay = self.apply_jitter(self.current_delay);

        #[allow(clippy::cast_precision_loss)]
        let scaled = (self.current_delay.as_millis() as f64 * self.config.multiplier).round();
        let next_millis = if scaled.is_finite() && scaled > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                scaled as u128
            }
        } else {
            0
        };
        let capped = next_millis.min(self.config.max_delay.as_millis());
        self.current_delay = Duration::from_millis(u64::try_from(capped).unwrap_or(u64::MAX));

        Some(delay)
    }

    fn apply_jitter(&self, duration: Duration) -> Duration {
        if self.config.jitter_factor <= 0.0 {
            return duration;
        }

        #[allow(clippy::cast_precision_loss)]
        let base_millis = duration.as_millis() as f64;
        let jitter_range = base_millis * self.config.jitter_factor;
        let jitter: f64 = rand::rng().random_range(-jitter_range..=jitter_range);
        let adjusted_millis = (base_millis + jitter).max(1.0);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let adjusted_u64 = adjusted_millis as u64;
        Duration::from_millis(adjusted_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
            multiplier: 2.0,
            jitter_factor: 0.0,
            max_attempts,
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let mut policy = RetryPolicy::new(no_jitter(10));
        policy.begin_attempt();
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(100)));
        policy.begin_attempt();
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(200)));
        policy.begin_attempt();
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(300)));
        policy.begin_attempt();
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn attempts_include_first_call() {
        let mut policy = RetryPolicy::new(no_jitter(3));
        policy.begin_attempt();
        assert!(policy.next_delay().is_some());
        policy.begin_attempt();
        assert!(policy.next_delay().is_some());
        policy.begin_attempt();
        assert!(policy.next_delay().is_none());
        assert_eq!(policy.attempts(), 3);
    }

    #[test]
    fn single_attempt_never_retries() {
        let mut policy = RetryPolicy::new(no_jitter(0));
        policy.begin_attempt();
        assert!(policy.next_delay().is_none());
    }

    #[test]
    fn jitter_bounds() {
        for _ in 0..100 {
            let mut policy = RetryPolicy::new(RetryConfig {
                initial_delay: Duration::from_millis(1000),
                ..RetryConfig::default()
            });
            policy.begin_attempt();
            let millis = policy.next_delay().unwrap().as_millis();
            assert!((900..=1100).contains(&millis), "delay {millis}ms out of range");
        }
    }
}
