use core::panic::AssertUnwindSafe;
use std::panic;
use std::thread;

use crate::budget::Budget;
use crate::{CheckFailure, CheckOutcome, RetryOutcome, RetryPolicy};

/// Runs `check` once, turning a panic into a failure.
fn attempt<F, R>(check: &mut F) -> Result<(), CheckFailure>
where
    F: FnMut() -> R,
    R: CheckOutcome,
{
    match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(outcome) => outcome.into_outcome(),
        Err(payload) => Err(CheckFailure::from_panic(payload)),
    }
}

pub(crate) fn poll<F, R>(policy: &RetryPolicy, mut check: F) -> RetryOutcome
where
    F: FnMut() -> R,
    R: CheckOutcome,
{
    let mut budget = Budget::start(policy);

    loop {
        budget.attempt();
        let failure = match attempt(&mut check) {
            Ok(()) => return budget.success(),
            Err(failure) => failure,
        };
        log::debug!("check attempt {} failed: {failure}", budget.attempts());

        let Some(pause) = budget.next_pause() else {
            return budget.timed_out(failure);
        };

        if pause.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(pause);
        }

        if budget.expired() {
            return budget.timed_out(failure);
        }
    }
}
