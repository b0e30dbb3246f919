use core::future::Future;
use core::panic::AssertUnwindSafe;
use std::panic;

use async_io::Timer;
use futures_lite::FutureExt;
use futures_lite::future;

use crate::budget::Budget;
use crate::{CheckFailure, CheckOutcome, RetryOutcome, RetryPolicy};

async fn attempt<F, Fut>(check: &mut F) -> Result<(), CheckFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output: CheckOutcome>,
{
    // Creating the future may panic as well as polling it.
    let fut = match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(fut) => fut,
        Err(payload) => return Err(CheckFailure::from_panic(payload)),
    };

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(outcome) => outcome.into_outcome(),
        Err(payload) => Err(CheckFailure::from_panic(payload)),
    }
}

pub(crate) async fn poll<F, Fut>(policy: &RetryPolicy, mut check: F) -> RetryOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output: CheckOutcome>,
{
    let mut budget = Budget::start(policy);

    loop {
        budget.attempt();
        let failure = match attempt(&mut check).await {
            Ok(()) => return budget.success(),
            Err(failure) => failure,
        };
        log::debug!("check attempt {} failed: {failure}", budget.attempts());

        let Some(pause) = budget.next_pause() else {
            return budget.timed_out(failure);
        };

        if pause.is_zero() {
            future::yield_now().await;
        } else {
            Timer::after(pause).await;
        }

        if budget.expired() {
            return budget.timed_out(failure);
        }
    }
}
