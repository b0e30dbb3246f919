use alloc::boxed::Box;
use alloc::string::String;
use core::error::Error;

use thiserror::Error;

use crate::access::MemberKind;
use crate::info::Type;

/// The error type of a type-erased method body.
///
/// Produced by [`ArgCursor::take`](crate::access::ArgCursor::take) and by
/// generated invokers; [`invoke_method`](crate::access::invoke_method) turns
/// it into an [`AccessError`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvokeError {
    #[error("argument {index} is missing")]
    MissingArgument { index: usize },

    #[error("argument {index} should be `{expected}`, found `{found}`")]
    ArgumentType {
        index: usize,
        expected: Type,
        found: Type,
    },

    #[error("receiver is not the declaring type")]
    Receiver,

    #[error("method takes `&mut self`")]
    MutableReceiver,

    /// The method body itself failed.
    #[error(transparent)]
    Raised(Box<dyn Error + Send + Sync>),
}

impl InvokeError {
    /// Wraps an error returned by the method body.
    #[inline]
    pub fn raised(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Raised(error.into())
    }
}

/// Errors reported by member lookups, reads, writes and invocations.
///
/// All of them are immediate: nothing is retried and the instance is left
/// as it was, except for [`Invocation`](Self::Invocation), where the method
/// ran and may have had side effects of its own.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccessError {
    #[error("no non-public instance {kind} `{name}` is declared on `{type_path}` or its ancestors")]
    MemberNotFound {
        kind: MemberKind,
        name: String,
        /// The most-derived type the lookup started from.
        type_path: &'static str,
    },

    #[error("cannot assign `{found}` to field `{declaring}::{name}` of type `{expected}`")]
    InvalidAssignment {
        name: String,
        declaring: &'static str,
        expected: Type,
        found: Type,
    },

    #[error("field `{declaring}::{name}` has type `{actual}`, not `{requested}`")]
    FieldTypeMismatch {
        name: String,
        declaring: &'static str,
        actual: Type,
        requested: Type,
    },

    #[error("method `{declaring}::{name}` expects {expected} but was given {found}")]
    ArgumentMismatch {
        name: String,
        declaring: &'static str,
        expected: String,
        found: String,
    },

    #[error("method `{declaring}::{name}` is declared {count} times, overloads cannot be told apart")]
    AmbiguousMethod {
        name: String,
        declaring: &'static str,
        count: usize,
    },

    #[error("method `{declaring}::{name}` failed")]
    Invocation {
        name: String,
        declaring: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// A `&mut self` method was invoked through a shared borrow.
    #[error("method `{declaring}::{name}` takes `&mut self` and cannot run on a shared borrow")]
    MutableReceiver { name: String, declaring: &'static str },

    #[error("instance could not be viewed as `{expected}`")]
    ReceiverMismatch { expected: &'static str },
}

impl AccessError {
    /// Returns `true` for [`MemberNotFound`](Self::MemberNotFound).
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::MemberNotFound { .. })
    }
}
