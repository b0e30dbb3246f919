use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::error::Error;

use thiserror::Error;

// -----------------------------------------------------------------------------
// CheckFailure

/// Why one attempt of a check did not pass.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckFailure {
    /// The check returned an error.
    #[error(transparent)]
    Error(Box<dyn Error + Send + Sync>),

    /// The check panicked, usually from a failed `assert!`.
    #[error("check panicked: {0}")]
    Panicked(String),

    /// The check returned `false`.
    #[error("check returned false")]
    Unsatisfied,
}

impl CheckFailure {
    /// Builds a failure from the payload of a caught panic.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast_ref::<&'static str>() {
                Some(message) => String::from(*message),
                None => String::from("<non-string panic payload>"),
            },
        };
        Self::Panicked(message)
    }

    /// Returns the error returned by the check, if that is what failed.
    pub fn as_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Error(err) => Some(&**err),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// CheckOutcome

/// The result of one attempt of a check.
///
/// Implemented for:
///
/// - `()`: the check fails by panicking, e.g. through `assert!`.
/// - `bool`: `false` is a failure.
/// - `Result<(), E>`: `Err` is a failure, kept as [`CheckFailure::Error`].
pub trait CheckOutcome {
    fn into_outcome(self) -> Result<(), CheckFailure>;
}

impl CheckOutcome for () {
    #[inline]
    fn into_outcome(self) -> Result<(), CheckFailure> {
        Ok(())
    }
}

impl CheckOutcome for bool {
    #[inline]
    fn into_outcome(self) -> Result<(), CheckFailure> {
        if self {
            Ok(())
        } else {
            Err(CheckFailure::Unsatisfied)
        }
    }
}

impl<E> CheckOutcome for Result<(), E>
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    #[inline]
    fn into_outcome(self) -> Result<(), CheckFailure> {
        self.map_err(|err| CheckFailure::Error(err.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckFailure, CheckOutcome};
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};

    #[test]
    fn outcomes() {
        assert!(().into_outcome().is_ok());
        assert!(true.into_outcome().is_ok());
        assert!(matches!(false.into_outcome(), Err(CheckFailure::Unsatisfied)));

        let failed = Err::<(), _>("not yet").into_outcome().unwrap_err();
        assert_eq!(failed.as_error().unwrap().to_string(), "not yet");
    }

    #[test]
    fn panic_payloads() {
        let from_str = CheckFailure::from_panic(Box::new("static"));
        let from_string = CheckFailure::from_panic(Box::new(String::from("owned")));
        let other = CheckFailure::from_panic(Box::new(7_u8));

        assert_eq!(from_str.to_string(), "check panicked: static");
        assert_eq!(from_string.to_string(), "check panicked: owned");
        assert!(matches!(other, CheckFailure::Panicked(_)));
    }
}
