use core::time::Duration;
use std::time::Instant;

use crate::{CheckFailure, ConditionTimeoutError, RetryOutcome, RetryPolicy};

/// Bookkeeping shared by the blocking and async loops.
pub(crate) struct Budget {
    start: Instant,
    timeout: Duration,
    poll_interval: Duration,
    attempts: u32,
}

impl Budget {
    /// Starts the clock.
    #[inline]
    pub fn start(policy: &RetryPolicy) -> Self {
        Self {
            start: Instant::now(),
            timeout: policy.timeout(),
            poll_interval: policy.poll_interval(),
            attempts: 0,
        }
    }

    /// Counts one more attempt.
    #[inline]
    pub fn attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    #[inline]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[inline]
    pub fn success(&self) -> RetryOutcome {
        RetryOutcome::Success {
            attempts: self.attempts,
        }
    }

    /// Returns the pause before the next attempt, or `None` once the budget
    /// is spent. The pause never runs past the deadline.
    pub fn next_pause(&self) -> Option<Duration> {
        let remaining = self.timeout.checked_sub(self.start.elapsed())?;
        if remaining.is_zero() {
            return None;
        }
        Some(self.poll_interval.min(remaining))
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.timeout
    }

    pub fn timed_out(self, last_failure: CheckFailure) -> RetryOutcome {
        let elapsed = self.start.elapsed();
        log::warn!(
            "condition not met within {:?}, giving up after {} attempts: {last_failure}",
            self.timeout,
            self.attempts,
        );
        RetryOutcome::TimedOut(ConditionTimeoutError::new(
            self.timeout,
            elapsed,
            self.attempts,
            last_failure,
        ))
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::Budget;
    use crate::RetryPolicy;

    #[test]
    fn pause_is_cut_to_the_deadline() {
        let policy = RetryPolicy::new()
            .with_timeout(Duration::from_secs(60))
            .with_poll_interval(Duration::from_millis(100));
        let budget = Budget::start(&policy);
        assert_eq!(budget.next_pause(), Some(Duration::from_millis(100)));

        let policy = policy.with_poll_interval(Duration::from_secs(3600));
        let pause = Budget::start(&policy).next_pause().unwrap();
        assert!(pause <= Duration::from_secs(60));

        let spent = Budget::start(&policy.with_timeout(Duration::ZERO));
        assert_eq!(spent.next_pause(), None);
        assert!(spent.expired());
        assert_eq!(spent.attempts(), 0);
    }
}
