//! Retry policy shared by all remote API calls.

use std::time::Duration;

use reqwest::StatusCode;

/// How a response or transport error should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Transient; back off and try again.
    Retry,
    /// Client-side rejection; retrying cannot help.
    Fatal,
}

/// Exponential-backoff retry policy.
///
/// Attempt `n` (1-based) that fails retryably sleeps `base_delay * 2^(n-1)`
/// before the next try. HTTP 429 and all 5xx are retryable; every other 4xx
/// aborts immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, first try included.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Classify a response status.
    pub fn classify_status(status: StatusCode) -> Option<RetryClass> {
        if status.is_success() {
            None
        } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Some(RetryClass::Retry)
        } else {
            Some(RetryClass::Fatal)
        }
    }

    /// Classify a transport error. Timeouts and connection failures are
    /// transient; anything else (TLS, malformed request) is fatal.
    pub fn classify_transport(err: &reqwest::Error) -> RetryClass {
        if err.is_timeout() || err.is_connect() {
            RetryClass::Retry
        } else {
            RetryClass::Fatal
        }
    }

    /// Backoff delay after the given 1-based failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    pub fn attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
