//! Retry policies consulted by the transport on failed attempts.

use std::time::Duration;

use crate::{ConnectionState, EtcdError};

/// Decides whether a failed attempt is retried and how long to wait
/// before the next one.
///
/// The transport consults the policy once per failure; when it declines,
/// the failure becomes the request's terminal error. Endpoint selection
/// on retry is not the policy's concern — the transport rotates
/// round-robin over its endpoint set.
pub trait RetryPolicy: Send + Sync + 'static {
    /// Whether another attempt should be made for this failure.
    fn should_retry(&self, state: &ConnectionState, error: &EtcdError) -> bool;

    /// Delay before the next attempt.
    fn next_delay(&self, state: &ConnectionState) -> Duration;
}

/// Retries up to a fixed number of times with a constant delay.
#[derive(Clone, Debug)]
pub struct RetryNTimes {
    max_retries: u32,
    delay: Duration,
}

impl RetryNTimes {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

impl RetryPolicy for RetryNTimes {
    fn should_retry(&self, state: &ConnectionState, error: &EtcdError) -> bool {
        error.is_retryable() && state.retry_count() < self.max_retries
    }

    fn next_delay(&self, _state: &ConnectionState) -> Duration {
        self.delay
    }
}

/// Exponential backoff: the delay doubles per retry, capped at `max_delay`.
///
/// An optional total-time budget bounds the whole attempt sequence,
/// measured from the sequence start rather than per attempt.
#[derive(Clone, Debug)]
pub struct RetryWithBackoff {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    max_total: Option<Duration>,
}

impl RetryWithBackoff {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay: Duration::from_secs(10),
            max_total: None,
        }
    }

    /// Caps the per-retry delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Bounds the whole attempt sequence, including time spent waiting.
    pub fn with_max_total(mut self, max_total: Duration) -> Self {
        self.max_total = Some(max_total);
        self
    }

    fn delay_for(&self, retry_count: u32) -> Duration {
        let exp = retry_count.min(16);
        let multiplier = 1u32 << exp;
        self.initial_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }
}

impl Default for RetryWithBackoff {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}

impl RetryPolicy for RetryWithBackoff {
    fn should_retry(&self, state: &ConnectionState, error: &EtcdError) -> bool {
        if !error.is_retryable() || state.retry_count() >= self.max_retries {
            return false;
        }
        match self.max_total {
            Some(budget) => state.started_at().elapsed() < budget,
            None => true,
        }
    }

    fn next_delay(&self, state: &ConnectionState) -> Duration {
        self.delay_for(state.retry_count())
    }
}
