//! Random spread added to each backoff delay.

use std::time::Duration;

use rand::Rng;

/// Source of backoff jitter in `0..=max`.
pub trait Jitter: Send + Sync {
    fn sample(&self, max: Duration) -> Duration;
}

/// Uniform jitter from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self, max: Duration) -> Duration {
        if max.is_zero() {
            return Duration::ZERO;
        }
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

/// Always the same jitter, capped at `max`. Makes delays deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedJitter(pub Duration);

impl Jitter for FixedJitter {
    fn sample(&self, max: Duration) -> Duration {
        self.0.min(max)
    }
}
