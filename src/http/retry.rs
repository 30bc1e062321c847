//! Retry state for one in-flight request

use crate::error::ApiError;
use crate::options::Retries;
use std::time::Duration;

/// Remaining budget and next backoff delay
///
/// Owned by a single executor call and dropped with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryState {
    remaining: Retries,
    delay: Duration,
    backoff: f64,
}

impl RetryState {
    /// Start with the configured budget and first delay
    pub fn new(retries: Retries, retry_delay: Duration, retry_backoff: f64) -> Self {
        Self {
            remaining: retries,
            delay: retry_delay,
            backoff: retry_backoff,
        }
    }

    /// Retries left
    pub fn remaining(&self) -> Retries {
        self.remaining
    }

    /// Delay the next non-rate-limit retry will use
    pub fn current_delay(&self) -> Duration {
        self.delay
    }

    /// Decide what to do after a failed attempt
    ///
    /// Returns how long to sleep before retrying, or `None` when the error
    /// must be propagated. Rate limit errors wait for exactly the
    /// server-provided duration and leave the backoff schedule untouched;
    /// other retryable errors wait the current delay, which is then
    /// multiplied by the backoff factor.
    pub fn next_delay(&mut self, error: &ApiError) -> Option<Duration> {
        if !error.is_retryable() {
            return None;
        }

        match &mut self.remaining {
            Retries::Bounded(0) => return None,
            Retries::Bounded(n) => *n -= 1,
            Retries::Unbounded => {}
        }

        if let Some(retry_after) = error.retry_after() {
            return Some(retry_after);
        }

        let delay = self.delay;
        self.delay = Duration::try_from_secs_f64(delay.as_secs_f64() * self.backoff)
            .unwrap_or(Duration::MAX);
        Some(delay)
    }
}
