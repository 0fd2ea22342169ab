use crate::retry::RetryPolicy;
use crate::retry::jitter::Jitter;

use std::time::Duration;

use ::backoff::backoff::Backoff;

/// Exponential backoff for rate-limited calls.
///
/// The n-th delay (zero-based) is `base_delay * 2^n + jitter(0..=max_jitter)`.
/// Yields `max_attempts - 1` delays, one between each pair of calls, then `None`.
pub struct RateLimitBackoff<'a, J: Jitter + ?Sized> {
    base_delay: Duration,
    max_jitter: Duration,
    max_attempts: u32,
    attempt: u32,
    jitter: &'a J,
}

impl<'a, J: Jitter + ?Sized> RateLimitBackoff<'a, J> {
    pub fn new(policy: &RetryPolicy, jitter: &'a J) -> Self {
        Self {
            base_delay: policy.base_delay,
            max_jitter: policy.max_jitter,
            max_attempts: policy.max_attempts.max(1),
            attempt: 0,
            jitter,
        }
    }

    /// Delay before jitter for the given zero-based attempt.
    ///
    /// Saturates at `Duration::MAX` once `2^attempt` no longer fits.
    pub fn exponential_delay(&self, attempt: u32) -> Duration {
        match 2u32.checked_pow(attempt) {
            Some(factor) => self.base_delay.saturating_mul(factor),
            None if self.base_delay.is_zero() => Duration::ZERO,
            None => Duration::MAX,
        }
    }
}

impl<J: Jitter + ?Sized> Backoff for RateLimitBackoff<'_, J> {
    fn reset(&mut self) {
        self.attempt = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.attempt + 1 >= self.max_attempts {
            return None;
        }

        let delay = self
            .exponential_delay(self.attempt)
            .saturating_add(self.jitter.sample(self.max_jitter));
        self.attempt += 1;
        Some(delay)
    }
}
