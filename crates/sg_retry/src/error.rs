use core::time::Duration;

use thiserror::Error;

use crate::CheckFailure;

/// A polled condition did not pass within its time budget.
///
/// The last failure of the check is the [`source`](core::error::Error::source).
#[derive(Debug, Error)]
#[error("condition was not met within {timeout:?} ({attempts} attempts over {elapsed:?})")]
pub struct ConditionTimeoutError {
    timeout: Duration,
    elapsed: Duration,
    attempts: u32,
    #[source]
    last_failure: CheckFailure,
}

impl ConditionTimeoutError {
    #[inline]
    pub(crate) const fn new(
        timeout: Duration,
        elapsed: Duration,
        attempts: u32,
        last_failure: CheckFailure,
    ) -> Self {
        Self {
            timeout,
            elapsed,
            attempts,
            last_failure,
        }
    }

    /// Returns the configured timeout.
    #[inline]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the time spent polling, measured when the loop gave up.
    #[inline]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns how many times the check ran. Always at least one.
    #[inline]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the failure of the last attempt.
    #[inline]
    pub const fn last_failure(&self) -> &CheckFailure {
        &self.last_failure
    }

    #[inline]
    pub fn into_last_failure(self) -> CheckFailure {
        self.last_failure
    }
}
