use core::time::Duration;

use crate::{CheckOutcome, ConditionTimeoutError};

// -----------------------------------------------------------------------------
// RetryOutcome

/// The raw result of a polling loop, see [`RetryPolicy::poll`].
#[derive(Debug)]
pub enum RetryOutcome {
    /// An attempt passed; no attempt was made after it.
    Success { attempts: u32 },
    /// The budget ran out. Carries the last failure.
    TimedOut(ConditionTimeoutError),
}

impl RetryOutcome {
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns how many times the check ran.
    #[inline]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts } => *attempts,
            Self::TimedOut(err) => err.attempts(),
        }
    }

    #[inline]
    pub fn into_result(self) -> Result<(), ConditionTimeoutError> {
        match self {
            Self::Success { .. } => Ok(()),
            Self::TimedOut(err) => Err(err),
        }
    }
}

// -----------------------------------------------------------------------------
// RetryPolicy

/// Time budget of a polling loop.
///
/// The check runs at least once. After a failed attempt the caller pauses
/// for the poll interval (cut short at the deadline) and no attempt starts
/// once the timeout has elapsed. A zero poll interval yields instead of
/// sleeping.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sg_retry::RetryPolicy;
///
/// let policy = RetryPolicy::new()
///     .with_timeout(Duration::from_millis(200))
///     .with_poll_interval(Duration::from_millis(10));
///
/// let mut calls = 0;
/// policy
///     .run(|| {
///         calls += 1;
///         calls == 3
///     })
///     .unwrap();
/// assert_eq!(calls, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    timeout: Duration,
    poll_interval: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Creates a policy with the default 5 s timeout and 100 ms interval.
    #[inline]
    pub const fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    #[inline]
    pub const fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    #[inline]
    pub const fn with_poll_interval(self, poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..self
        }
    }

    #[inline]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[inline]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Runs `check` until it passes or the budget runs out, blocking the
    /// current thread between attempts.
    ///
    /// Panics raised by `check` count as failed attempts.
    pub fn poll<F, R>(&self, check: F) -> RetryOutcome
    where
        F: FnMut() -> R,
        R: CheckOutcome,
    {
        crate::blocking::poll(self, check)
    }

    /// Like [`poll`](Self::poll), failing with the last failure on timeout.
    ///
    /// # Errors
    ///
    /// [`ConditionTimeoutError`] when no attempt passed within the timeout.
    #[inline]
    pub fn run<F, R>(&self, check: F) -> Result<(), ConditionTimeoutError>
    where
        F: FnMut() -> R,
        R: CheckOutcome,
    {
        self.poll(check).into_result()
    }

    /// Async counterpart of [`poll`](Self::poll).
    ///
    /// Pauses on an `async-io` timer, so the thread is free to run other
    /// tasks between attempts.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn poll_async<F, Fut>(&self, check: F) -> RetryOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output: CheckOutcome>,
    {
        crate::future::poll(self, check).await
    }

    /// Async counterpart of [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// [`ConditionTimeoutError`] when no attempt passed within the timeout.
    #[cfg(feature = "async")]
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn run_async<F, Fut>(&self, check: F) -> Result<(), ConditionTimeoutError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output: CheckOutcome>,
    {
        self.poll_async(check).await.into_result()
    }
}

impl Default for RetryPolicy {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Serde

#[cfg(feature = "serde")]
mod serde_impls {
    use core::fmt;
    use core::time::Duration;

    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::ser::{self, SerializeStruct};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::RetryPolicy;

    const FIELDS: &[&str] = &["timeout_ms", "poll_interval_ms"];

    /// Whole milliseconds of `duration`. Anything finer would be lost, so it
    /// is an error rather than a silent truncation.
    fn millis<E: ser::Error>(field: &str, duration: Duration) -> Result<u64, E> {
        if duration.subsec_nanos() % 1_000_000 != 0 {
            return Err(E::custom(format_args!(
                "`{field}` of {duration:?} is not a whole number of milliseconds"
            )));
        }
        u64::try_from(duration.as_millis())
            .map_err(|_| E::custom(format_args!("`{field}` of {duration:?} is out of range")))
    }

    impl Serialize for RetryPolicy {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut state = serializer.serialize_struct("RetryPolicy", 2)?;
            state.serialize_field("timeout_ms", &millis::<S::Error>("timeout", self.timeout)?)?;
            state.serialize_field(
                "poll_interval_ms",
                &millis::<S::Error>("poll_interval", self.poll_interval)?,
            )?;
            state.end()
        }
    }

    struct PolicyVisitor;

    impl<'de> Visitor<'de> for PolicyVisitor {
        type Value = RetryPolicy;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a retry policy with `timeout_ms` and `poll_interval_ms`")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<RetryPolicy, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let timeout: u64 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(0, &self))?;
            let poll_interval: u64 = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(1, &self))?;
            Ok(RetryPolicy::new()
                .with_timeout(Duration::from_millis(timeout))
                .with_poll_interval(Duration::from_millis(poll_interval)))
        }

        // Missing fields keep their defaults.
        fn visit_map<A>(self, mut map: A) -> Result<RetryPolicy, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut policy = RetryPolicy::new();
            while let Some(key) = map.next_key::<alloc::string::String>()? {
                match key.as_str() {
                    "timeout_ms" => {
                        policy = policy.with_timeout(Duration::from_millis(map.next_value()?));
                    }
                    "poll_interval_ms" => {
                        policy = policy.with_poll_interval(Duration::from_millis(map.next_value()?));
                    }
                    other => return Err(de::Error::unknown_field(other, FIELDS)),
                }
            }
            Ok(policy)
        }
    }

    impl<'de> Deserialize<'de> for RetryPolicy {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_struct("RetryPolicy", FIELDS, PolicyVisitor)
        }
    }
}
