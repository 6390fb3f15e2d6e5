//! Retry policy for outbound upstream requests.
//!
//! # Responsibilities
//! - Determine if a failed attempt is retryable
//! - Compute the delay before the next attempt
//!
//! # Design Decisions
//! - Only GET requests are sent upstream, so every attempt is idempotent
//! - Connection errors and timeouts are retryable; so are 408, 429 and 5xx
//! - 4xx other than 408/429 are final (a missing zone stays missing)

use reqwest::StatusCode;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::{backoff_ceiling, calculate_backoff};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        if !config.enabled {
            return Self::none();
        }
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the next attempt, or `None` once `attempt` (1-based) was the last.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            None
        } else {
            Some(calculate_backoff(attempt, self.base_delay, self.max_delay))
        }
    }
}

impl RetryPolicy {
    /// Longest a caller can wait for one logical request when every attempt
    /// runs into `per_attempt` and every backoff draws its maximum jitter.
    pub fn worst_case(&self, per_attempt: Duration) -> Duration {
        let backoff: Duration = (1..self.max_attempts)
            .map(|attempt| backoff_ceiling(attempt, self.base_delay, self.max_delay))
            .sum();
        per_attempt.saturating_mul(self.max_attempts).saturating_add(backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

pub fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
