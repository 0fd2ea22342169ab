use crate::retry::{FixedJitter, Jitter, RandomJitter, RateLimitBackoff, RetryPolicy};

use std::time::Duration;

use ::backoff::backoff::Backoff;

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        ..RetryPolicy::default()
    }
}

/// **VALUE**: Delays double from the base and stop after `max_attempts - 1` waits.
///
/// **WHY THIS MATTERS**: `max_attempts` counts calls, not waits. An off-by-one here either
/// makes one extra provider call (and one extra 429) or gives up a retry early.
#[test]
fn given_zero_jitter_when_iterating_backoff_then_delays_double_until_exhausted() {
    // GIVEN: Four attempts, no jitter
    let jitter = FixedJitter(Duration::ZERO);
    let mut backoff = RateLimitBackoff::new(&policy(4), &jitter);

    // WHEN/THEN: Three waits, then none
    assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1000)));
    assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(2000)));
    assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(4000)));
    assert_eq!(backoff.next_backoff(), None);
}

#[test]
fn given_fixed_jitter_when_iterating_backoff_then_jitter_added_to_each_delay() {
    let jitter = FixedJitter(Duration::from_millis(300));
    let mut backoff = RateLimitBackoff::new(&policy(3), &jitter);

    assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1300)));
    assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(2300)));
    assert_eq!(backoff.next_backoff(), None);
}

#[test]
fn given_single_or_zero_attempts_when_iterating_backoff_then_never_waits() {
    let jitter = FixedJitter(Duration::ZERO);

    assert_eq!(RateLimitBackoff::new(&policy(1), &jitter).next_backoff(), None);
    assert_eq!(RateLimitBackoff::new(&policy(0), &jitter).next_backoff(), None);
}

#[test]
fn given_exhausted_backoff_when_reset_then_starts_from_base_again() {
    let jitter = FixedJitter(Duration::ZERO);
    let mut backoff = RateLimitBackoff::new(&policy(2), &jitter);

    assert!(backoff.next_backoff().is_some());
    assert!(backoff.next_backoff().is_none());

    backoff.reset();

    assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1000)));
}

#[test]
fn given_huge_attempt_when_computing_delay_then_saturates_instead_of_overflowing() {
    let jitter = FixedJitter(Duration::ZERO);
    let backoff = RateLimitBackoff::new(&policy(3), &jitter);

    assert_eq!(backoff.exponential_delay(200), Duration::MAX);
}

/// **VALUE**: Delays keep doubling right up to the point the multiplier stops fitting.
///
/// **BUG THIS CATCHES**: Would catch a saturating exponent that pins the multiplier at
/// `u32::MAX`, leaving every later delay flat instead of saturating the duration.
#[test]
fn given_attempt_past_multiplier_range_when_computing_delay_then_saturates_to_max() {
    // GIVEN: A one second base delay
    let jitter = FixedJitter(Duration::ZERO);
    let backoff = RateLimitBackoff::new(&policy(3), &jitter);

    // WHEN / THEN: The last attempt with a representable multiplier still doubles
    assert_eq!(
        backoff.exponential_delay(31),
        Duration::from_millis(1000) * (1u32 << 31)
    );

    // THEN: The next one saturates
    assert_eq!(backoff.exponential_delay(32), Duration::MAX);
}

#[test]
fn given_zero_base_delay_when_attempt_is_huge_then_delay_stays_zero() {
    let jitter = FixedJitter(Duration::ZERO);
    let policy = RetryPolicy {
        base_delay: Duration::ZERO,
        ..policy(3)
    };
    let backoff = RateLimitBackoff::new(&policy, &jitter);

    assert_eq!(backoff.exponential_delay(64), Duration::ZERO);
}

#[test]
fn given_random_jitter_when_sampled_then_stays_within_bounds() {
    let max = Duration::from_millis(1000);

    for _ in 0..200 {
        assert!(RandomJitter.sample(max) <= max);
    }
    assert_eq!(RandomJitter.sample(Duration::ZERO), Duration::ZERO);
}

#[test]
fn given_fixed_jitter_above_max_when_sampled_then_capped() {
    let jitter = FixedJitter(Duration::from_millis(5000));

    assert_eq!(
        jitter.sample(Duration::from_millis(1000)),
        Duration::from_millis(1000)
    );
}
