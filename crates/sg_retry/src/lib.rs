#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// Clocks, sleeping and unwinding.
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod blocking;
mod budget;
mod check;
mod error;
mod policy;

#[cfg(feature = "async")]
mod future;

// -----------------------------------------------------------------------------
// Exports

pub use check::{CheckFailure, CheckOutcome};
pub use error::ConditionTimeoutError;
pub use policy::{RetryOutcome, RetryPolicy};

// -----------------------------------------------------------------------------
// Entry points

/// Polls `check` with the default policy (5 s timeout, 100 ms interval).
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::thread;
///
/// let ready = Arc::new(AtomicBool::new(false));
/// let writer = Arc::clone(&ready);
/// thread::spawn(move || writer.store(true, Ordering::Release));
///
/// sg_retry::await_condition(|| ready.load(Ordering::Acquire)).unwrap();
/// ```
///
/// # Errors
///
/// [`ConditionTimeoutError`] when no attempt passed within the timeout.
#[inline]
pub fn await_condition<F, R>(check: F) -> Result<(), ConditionTimeoutError>
where
    F: FnMut() -> R,
    R: CheckOutcome,
{
    RetryPolicy::new().run(check)
}

/// Polls `check` under `policy`. Same as [`RetryPolicy::run`].
///
/// # Errors
///
/// [`ConditionTimeoutError`] when no attempt passed within the timeout.
#[inline]
pub fn await_condition_with<F, R>(policy: &RetryPolicy, check: F) -> Result<(), ConditionTimeoutError>
where
    F: FnMut() -> R,
    R: CheckOutcome,
{
    policy.run(check)
}

/// Async counterpart of [`await_condition`].
///
/// # Errors
///
/// [`ConditionTimeoutError`] when no attempt passed within the timeout.
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
#[inline]
pub async fn await_condition_async<F, Fut>(check: F) -> Result<(), ConditionTimeoutError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output: CheckOutcome>,
{
    RetryPolicy::new().run_async(check).await
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::ToString;
    use core::cell::Cell;
    use core::time::Duration;
    use std::time::Instant;

    use crate::{CheckFailure, RetryOutcome, RetryPolicy, await_condition};

    fn policy(timeout_ms: u64, poll_ms: u64) -> RetryPolicy {
        RetryPolicy::new()
            .with_timeout(Duration::from_millis(timeout_ms))
            .with_poll_interval(Duration::from_millis(poll_ms))
    }

    #[test]
    fn defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.timeout(), Duration::from_secs(5));
        assert_eq!(policy.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn immediate_success_does_not_sleep() {
        let start = Instant::now();
        let outcome = policy(10_000, 10_000).poll(|| true);

        assert!(matches!(outcome, RetryOutcome::Success { attempts: 1 }));
        assert!(start.elapsed() < Duration::from_secs(1));

        await_condition(|| ()).unwrap();
    }

    #[test]
    fn always_failing_check_times_out() {
        let calls = Cell::new(0_u32);
        let start = Instant::now();

        let err = policy(200, 50)
            .run(|| {
                calls.set(calls.get() + 1);
                Err::<(), _>(format!("attempt {}", calls.get()))
            })
            .unwrap_err();

        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(err.timeout(), Duration::from_millis(200));
        assert_eq!(err.attempts(), calls.get());
        assert!(err.attempts() >= 2);

        let last = err.last_failure().as_error().unwrap().to_string();
        assert_eq!(last, format!("attempt {}", calls.get()));
    }

    #[test]
    fn stops_at_first_success() {
        let mut calls = 0;

        let outcome = policy(500, 50).poll(|| {
            calls += 1;
            calls > 2
        });

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn zero_timeout_still_runs_once() {
        let mut calls = 0;

        let err = policy(0, 50)
            .run(|| {
                calls += 1;
                false
            })
            .unwrap_err();

        assert_eq!(calls, 1);
        assert!(matches!(err.last_failure(), CheckFailure::Unsatisfied));
    }

    #[test]
    fn zero_interval_yields_and_retries() {
        let mut calls = 0_u32;

        let outcome = policy(1_000, 0).poll(|| {
            calls += 1;
            calls == 50
        });

        assert!(outcome.is_success());
        assert_eq!(calls, 50);

        let err = policy(20, 0).run(|| false).unwrap_err();
        assert!(err.attempts() > 1);
    }

    #[test]
    fn panics_are_failed_attempts() {
        let mut calls = 0;

        let err = policy(100, 10)
            .run(|| {
                calls += 1;
                assert_eq!(calls, 0, "call {calls}");
            })
            .unwrap_err();

        match err.last_failure() {
            CheckFailure::Panicked(message) => {
                assert!(message.contains(&format!("call {calls}")), "{message}");
            }
            other => panic!("unexpected failure: {other}"),
        }

        let mut calls = 0;
        policy(500, 10)
            .run(|| {
                calls += 1;
                assert!(calls >= 2);
            })
            .unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn timeout_error_exposes_last_failure_as_source() {
        use core::error::Error;

        let err = policy(0, 0).run(|| Err::<(), _>("stale")).unwrap_err();
        let source = err.source().unwrap();

        assert_eq!(source.to_string(), "stale");
        assert!(matches!(err.into_last_failure(), CheckFailure::Error(_)));
    }

    #[cfg(feature = "async")]
    mod async_tests {
        use alloc::format;
        use alloc::string::ToString;
        use core::cell::Cell;
        use core::time::Duration;
        use std::time::Instant;

        use futures_lite::future::block_on;

        use super::policy;
        use crate::{CheckFailure, RetryOutcome, await_condition_async};

        #[test]
        fn async_stops_at_first_success() {
            let calls = Cell::new(0);

            let outcome = block_on(policy(500, 50).poll_async(|| {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move { attempt > 2 }
            }));

            assert!(outcome.is_success());
            assert_eq!(calls.get(), 3);
        }

        #[test]
        fn async_times_out_with_last_failure() {
            let calls = Cell::new(0_u32);
            let start = Instant::now();

            let err = block_on(policy(200, 50).run_async(|| {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move { Err::<(), _>(format!("attempt {attempt}")) }
            }))
            .unwrap_err();

            assert!(start.elapsed() >= Duration::from_millis(200));
            assert_eq!(err.attempts(), calls.get());

            let last = err.last_failure().as_error().unwrap().to_string();
            assert_eq!(last, format!("attempt {}", calls.get()));
        }

        #[test]
        fn async_zero_interval_and_panics() {
            let calls = Cell::new(0);

            let err = block_on(policy(20, 0).run_async(|| {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move {
                    if attempt > 0 {
                        panic!("not ready");
                    }
                }
            }))
            .unwrap_err();

            assert!(calls.get() > 1);
            assert!(matches!(err.last_failure(), CheckFailure::Panicked(m) if m == "not ready"));
        }

        #[test]
        fn async_immediate_success_does_not_sleep() {
            let start = Instant::now();
            let outcome = block_on(policy(10_000, 10_000).poll_async(|| async { true }));

            assert!(matches!(outcome, RetryOutcome::Success { attempts: 1 }));
            assert!(start.elapsed() < Duration::from_secs(1));

            block_on(await_condition_async(|| async {})).unwrap();
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn policy_serde() {
        let policy = policy(250, 25);

        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, r#"{"timeout_ms":250,"poll_interval_ms":25}"#);
        assert_eq!(serde_json::from_str::<RetryPolicy>(&json).unwrap(), policy);

        let partial: RetryPolicy = serde_json::from_str(r#"{"timeout_ms":1000}"#).unwrap();
        assert_eq!(partial.timeout(), Duration::from_secs(1));
        assert_eq!(partial.poll_interval(), RetryPolicy::DEFAULT_POLL_INTERVAL);

        assert!(serde_json::from_str::<RetryPolicy>(r#"{"timeout":1}"#).is_err());

        // Sub-millisecond precision cannot be written without loss.
        let fine = policy.with_poll_interval(Duration::from_micros(500));
        let err = serde_json::to_string(&fine).unwrap_err();
        assert!(err.to_string().contains("poll_interval"), "{err}");
        assert!(serde_json::to_string(&policy.with_timeout(Duration::from_micros(1_500))).is_err());
    }
}
