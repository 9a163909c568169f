// Property-based tests for exponential backoff with jitter

use proptest::prelude::*;
use std::time::Duration;

use tutorpay::payments::errors::RetryPolicy;
use tutorpay::payments::{PaymentError, PaymentErrorHandler, PaymentErrorKind};

fn retryable_error() -> PaymentError {
    PaymentError::new(PaymentErrorKind::GatewayError, "HTTP_400", "gateway said no")
}

/// Delay for attempt n is base * 2^n capped at the max, plus at most 10%
#[test]
fn test_default_delays_follow_doubling_schedule() {
    let handler = PaymentErrorHandler::default();
    let error = retryable_error();

    for (attempt, base_ms) in [(0u32, 1000u64), (1, 2000), (2, 4000), (3, 8000)] {
        let delay = handler.get_retry_delay(&error, attempt).as_millis() as u64;
        assert!(
            (base_ms..=base_ms + base_ms / 10).contains(&delay),
            "attempt {} delay {}ms outside [{}, {}]",
            attempt,
            delay,
            base_ms,
            base_ms + base_ms / 10
        );
    }
}

#[test]
fn test_large_attempts_are_capped() {
    let handler = PaymentErrorHandler::default();
    let delay = handler.get_retry_delay(&retryable_error(), 10).as_millis() as u64;
    assert!((30_000..=33_000).contains(&delay), "delay {}ms", delay);
}

#[test]
fn test_zero_base_delay_means_no_wait() {
    let policy = RetryPolicy {
        max_retries: 3,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };
    assert_eq!(policy.backoff(5), Duration::ZERO);
}

proptest! {
    #[test]
    fn test_delay_within_jitter_bounds(attempt in 0u32..64) {
        let handler = PaymentErrorHandler::default();
        let backoff = handler.retry_policy().backoff(attempt).as_millis() as u64;
        let delay = handler.get_retry_delay(&retryable_error(), attempt).as_millis() as u64;

        prop_assert!(delay >= backoff);
        prop_assert!(delay <= backoff + backoff / 10);
        prop_assert!(delay <= 33_000);
    }

    #[test]
    fn test_backoff_is_monotonic(attempt in 0u32..63) {
        let policy = RetryPolicy::default();
        prop_assert!(policy.backoff(attempt) <= policy.backoff(attempt + 1));
    }

    #[test]
    fn test_backoff_respects_custom_cap(
        base_ms in 1u64..5_000,
        cap_ms in 1u64..60_000,
        attempt in 0u32..40,
    ) {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(cap_ms),
        };
        prop_assert!(policy.backoff(attempt) <= Duration::from_millis(cap_ms));
    }
}
