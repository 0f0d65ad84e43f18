//! Retry with exponential backoff, kept apart from the operation it wraps.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::LlmError;

/// How many times to attempt a request and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Base duration for exponential backoff
    pub initial_delay: Duration,
    /// Cap on the backoff duration
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Relative spread applied to each delay; 0.1 means +/- 10%.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the `retry`-th failed attempt (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let base_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);

        let jitter = self.jitter.clamp(0.0, 1.0);
        let factor = if jitter > 0.0 {
            1.0 - jitter + rand::random::<f64>() * 2.0 * jitter
        } else {
            1.0
        };

        let delay_ms = (base_ms * factor).max(0.0);
        if !delay_ms.is_finite() || delay_ms >= self.max_delay.as_millis() as f64 {
            return self.max_delay;
        }
        Duration::from_millis(delay_ms as u64)
    }

    /// Run `operation` until it succeeds, fails fatally, or runs out of attempts.
    ///
    /// `operation` receives the 1-based attempt number. Errors that are not
    /// [`LlmError::is_retryable`] are returned as-is without waiting.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let max_attempts = self.attempts();
        let mut attempt = 1;

        loop {
            let err = match operation(attempt).await {
                Ok(value) => {
                    debug!(attempt, "attempt succeeded");
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= max_attempts {
                warn!(attempts = attempt, error = %err, "giving up after final attempt");
                return Err(LlmError::ExhaustedRetries {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.delay_for(attempt - 1);
            warn!(
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "attempt failed, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
