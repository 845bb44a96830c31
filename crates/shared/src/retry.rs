//! Retry with exponential backoff.
//!
//! An operation is attempted up to `max_attempts` times. After the n-th
//! failure the loop waits `base_delay * 2^n` before trying again, so with the
//! defaults the waits are 2 s, 4 s, 8 s, ... There is no wait after the last
//! attempt.

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Raised once every attempt has failed
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("failed to execute {operation} after {attempts} tries")]
    Exhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },
}

/// Exponential backoff policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Time unit doubled on every failure
    pub base_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl Backoff {
    /// Delay after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(31)))
    }

    /// Run `op` until it succeeds, sleeping the current thread between attempts
    pub fn retry<T, E, F>(&self, operation: &str, op: F) -> Result<T, RetryError>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        self.retry_with_sleep(operation, op, std::thread::sleep)
    }

    /// Same as [`Backoff::retry`] with a caller-supplied sleep
    pub fn retry_with_sleep<T, E, F, S>(
        &self,
        operation: &str,
        mut op: F,
        mut sleep: S,
    ) -> Result<T, RetryError>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
        S: FnMut(Duration),
    {
        let mut attempt = 1u32;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => match self.after_failure(operation, attempt, &e) {
                    Some(delay) => {
                        sleep(delay);
                        attempt += 1;
                    }
                    None => return Err(self.exhausted(operation, &e)),
                },
            }
        }
    }

    /// Report a failure and decide whether another attempt follows
    fn after_failure(&self, operation: &str, attempt: u32, error: &dyn Display) -> Option<Duration> {
        warn!(
            operation = operation,
            attempt = attempt,
            max_attempts = self.max_attempts,
            error = %error,
            "Error"
        );

        if attempt >= self.max_attempts {
            return None;
        }

        let delay = self.delay_for(attempt);
        info!(
            operation = operation,
            delay_ms = delay.as_millis() as u64,
            "Retrying..."
        );
        Some(delay)
    }

    fn exhausted(&self, operation: &str, error: &dyn Display) -> RetryError {
        RetryError::Exhausted {
            operation: operation.to_string(),
            attempts: self.max_attempts.max(1),
            last_error: error.to_string(),
        }
    }
}

/// Run `op` with the default policy: ten attempts, waits of 2^n seconds
pub fn try_with_exponential_backoff<T, E, F>(operation: &str, op: F) -> Result<T, RetryError>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    Backoff::default().retry(operation, op)
}
