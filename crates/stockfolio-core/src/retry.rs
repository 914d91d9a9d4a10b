//! Retry budget and backoff between provider attempts.

use std::time::Duration;

/// Attempt budget for one provider call.
///
/// The delay grows linearly: `base_delay * attempt` after the given failed
/// attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1_000),
        }
    }
}

impl RetryConfig {
    pub fn linear(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Single attempt, no retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the given 1-based attempt has failed.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.max(1))
    }

    /// Delay before the next attempt once `attempt` (1-based) has failed,
    /// or `None` when the budget is spent.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.attempts()).then(|| self.delay(attempt))
    }

    /// Sum of all backoff delays when every attempt fails.
    pub fn worst_case_backoff(&self) -> Duration {
        (1..self.attempts())
            .map(|attempt| self.delay(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}
