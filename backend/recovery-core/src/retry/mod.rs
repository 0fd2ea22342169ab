//! Transparent retry for rate-limited provider calls.
//!
//! Only failures that report [`RateLimitSignal::is_rate_limited`] are
//! retried. Everything else, including transport failures, goes straight
//! back to the caller: retrying an authentication or registration failure
//! never succeeds and retrying a non-idempotent call is unsafe.
//!
//! Operations passed to the retrier must be idempotent.

pub mod backoff;
pub mod jitter;

pub use self::backoff::RateLimitBackoff;
pub use jitter::{FixedJitter, Jitter, RandomJitter};

use crate::config::RetrySettings;
use crate::events::{EventSink, LogEventSink, RecoveryEvent};
use crate::failure::RateLimitSignal;

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ::backoff::backoff::Backoff;
use log::{debug, warn};
use tokio::time::sleep as TokioSleep;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_jitter: Duration::from_millis(settings.max_jitter_ms),
        }
    }
}

pub struct BackoffRetrier<J: Jitter = RandomJitter> {
    policy: RetryPolicy,
    jitter: J,
    events: Arc<dyn EventSink>,
}

impl BackoffRetrier<RandomJitter> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_jitter(policy, RandomJitter)
    }
}

impl Default for BackoffRetrier<RandomJitter> {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl<J: Jitter> BackoffRetrier<J> {
    pub fn with_jitter(policy: RetryPolicy, jitter: J) -> Self {
        Self {
            policy,
            jitter,
            events: Arc::new(LogEventSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation`, retrying while it fails with a rate-limit error.
    ///
    /// Returns the first success. A non-rate-limit failure is returned as-is
    /// after a single call. When attempts run out, the last rate-limit
    /// failure is returned unchanged.
    pub async fn retry<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RateLimitSignal + Display,
    {
        let mut backoff = RateLimitBackoff::new(&self.policy, &self.jitter);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_rate_limited() {
                debug!("Attempt {attempt} failed with non-retryable error: {err}");
                return Err(err);
            }

            match backoff.next_backoff() {
                Some(delay) => {
                    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    debug!("Attempt {attempt} rate limited, retrying after {delay:?}");
                    self.events
                        .record(RecoveryEvent::BackoffAttempt { attempt, delay_ms });
                    TokioSleep(delay).await;
                }
                None => {
                    warn!("Still rate limited after {attempt} attempts: {err}");
                    return Err(err);
                }
            }
        }
    }
}
