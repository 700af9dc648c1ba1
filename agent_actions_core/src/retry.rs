//! Retry-with-backoff for network-bound handler work.
//!
//! This is not a containment boundary: once attempts run out the last error
//! goes back to the caller. Handlers use it around flaky external calls and
//! let the [`Tool`](crate::tool::Tool) turn the final failure into text.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RetryError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Run `op` until it succeeds, retrying up to `max_retries` times.
///
/// Retry `i` (counting from zero) waits `base_delay * 2^i` first, so
/// `max_retries + 1` attempts are made in the worst case. Waiting uses
/// `tokio::time::sleep` and never blocks the runtime thread.
pub async fn retry_with_backoff<T, E, F, Fut>(
    op: F,
    max_retries: u32,
    base_delay: Duration,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_backoff_if(op, max_retries, base_delay, |_| true).await
}

/// Like [`retry_with_backoff`], but only errors for which `should_retry`
/// holds are retried. Any other error stops immediately as
/// [`RetryError::Aborted`].
pub async fn retry_with_backoff_if<T, E, F, Fut, P>(
    mut op: F,
    max_retries: u32,
    base_delay: Duration,
    should_retry: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut retries: u32 = 0;
    loop {
        let error = match op().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        let attempts = retries.saturating_add(1);

        if !should_retry(&error) {
            tracing::debug!(attempts, error = %error, "error is not retryable");
            return Err(RetryError::Aborted {
                attempts,
                last_error: error,
            });
        }
        if retries >= max_retries {
            tracing::debug!(attempts, error = %error, "retries exhausted");
            return Err(RetryError::Exhausted {
                attempts,
                last_error: error,
            });
        }

        let delay = backoff_delay(base_delay, retries);
        tracing::warn!(
            attempt = attempts,
            max_attempts = max_retries.saturating_add(1),
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "attempt failed, retrying"
        );
        tokio::time::sleep(delay).await;
        retries = attempts;
    }
}

/// `base * 2^retry_index`, saturating instead of overflowing.
pub fn backoff_delay(base: Duration, retry_index: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(retry_index))
}

/// Retry settings carried by providers and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    #[serde(with = "duration_millis")]
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        retry_with_backoff(op, self.max_retries, self.base_delay).await
    }

    /// [`RetryPolicy::run`] restricted to errors `should_retry` accepts.
    pub async fn run_if<T, E, F, Fut, P>(&self, op: F, should_retry: P) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        retry_with_backoff_if(op, self.max_retries, self.base_delay, should_retry).await
    }

    /// Total time slept if every attempt fails.
    pub fn worst_case_delay(&self) -> Duration {
        let mut total = Duration::ZERO;
        for i in 0..self.max_retries {
            total = total.saturating_add(backoff_delay(self.base_delay, i));
            if total == Duration::MAX {
                break;
            }
        }
        total
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BASE_DELAY)
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
