use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::{self, Vec};
use core::any::{Any, TypeId};
use core::fmt;

use crate::access::InvokeError;
use crate::info::Type;

// -----------------------------------------------------------------------------
// Arg

/// A single boxed argument and its type.
pub struct Arg {
    ty: Type,
    value: Box<dyn Any>,
}

impl Arg {
    #[inline]
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            ty: Type::of::<T>(),
            value: Box::new(value),
        }
    }

    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub fn into_inner(self) -> Box<dyn Any> {
        self.value
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Arg").field(&self.ty).finish()
    }
}

// -----------------------------------------------------------------------------
// Args

/// An ordered, positional argument list.
///
/// Usually built with the [`args!`](crate::access::args) macro.
///
/// ```
/// use sg_reflect::access::{Args, args};
///
/// let a = args![1_u8, String::from("two")];
/// let b = Args::new().with(1_u8).with(String::from("two"));
///
/// assert_eq!(a.len(), 2);
/// assert!(a.types().eq(b.types()));
/// ```
#[derive(Debug, Default)]
pub struct Args(Vec<Arg>);

impl Args {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `value` and returns `self`.
    #[inline]
    pub fn with<T: Any>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    #[inline]
    pub fn push<T: Any>(&mut self, value: T) {
        self.0.push(Arg::new(value));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the argument types in order.
    pub fn types(&self) -> impl ExactSizeIterator<Item = Type> + '_ {
        self.0.iter().map(Arg::ty)
    }

    /// Renders the argument types as `(T0, T1, ..)`.
    pub fn signature(&self) -> String {
        render_types(self.types())
    }

    #[inline]
    pub(crate) fn into_cursor(self) -> ArgCursor {
        ArgCursor {
            args: self.0.into_iter(),
            index: 0,
        }
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub(crate) fn render_types(types: impl Iterator<Item = Type>) -> String {
    use core::fmt::Write;

    let mut out = String::from("(");
    for (index, ty) in types.enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        // Writing into a `String` cannot fail.
        let _ = write!(out, "{ty}");
    }
    out.push(')');
    out
}

/// Builds an [`Args`] list from expressions.
///
/// ```
/// use sg_reflect::access::args;
///
/// let none = args![];
/// let some = args![1_i32, 'c', "literal"];
///
/// assert!(none.is_empty());
/// assert_eq!(some.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::access::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::access::Args::new()$(.with($value))+
    };
}

// -----------------------------------------------------------------------------
// ArgCursor

/// Hands the arguments of one call to the invoked method, left to right.
///
/// Generated method invokers call [`take`](Self::take) once per parameter.
#[derive(Debug)]
pub struct ArgCursor {
    args: vec::IntoIter<Arg>,
    index: usize,
}

impl ArgCursor {
    /// Takes the next argument as a `T`.
    pub fn take<T: Any>(&mut self) -> Result<T, InvokeError> {
        let index = self.index;
        self.index += 1;

        let arg = self.args.next().ok_or(InvokeError::MissingArgument { index })?;
        let found = arg.ty;
        arg.value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| InvokeError::ArgumentType {
                index,
                expected: Type::of::<T>(),
                found,
            })
    }

    /// Returns the number of arguments not taken yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.args.len()
    }
}

// -----------------------------------------------------------------------------
// Returned

/// The result of a successful invocation.
pub enum Returned {
    /// The method returns `()`.
    Unit,
    /// The method returned a value.
    Value { ty: Type, value: Box<dyn Any> },
}

impl Returned {
    /// Wraps `value`, turning `()` into [`Returned::Unit`].
    pub fn from_value<T: Any>(value: T) -> Self {
        if TypeId::of::<T>() == TypeId::of::<()>() {
            return Self::Unit;
        }
        Self::Value {
            ty: Type::of::<T>(),
            value: Box::new(value),
        }
    }

    #[inline]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }

    /// Returns the type of the returned value, `None` for [`Unit`](Self::Unit).
    #[inline]
    pub fn ty(&self) -> Option<Type> {
        match self {
            Self::Unit => None,
            Self::Value { ty, .. } => Some(*ty),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Unit => None,
            Self::Value { value, .. } => value.downcast_ref(),
        }
    }

    /// Takes the returned value as a `T`, handing `self` back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        match self {
            Self::Unit => Err(Self::Unit),
            Self::Value { ty, value } => match value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(value) => Err(Self::Value { ty, value }),
            },
        }
    }
}

impl fmt::Debug for Returned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("Unit"),
            Self::Value { ty, .. } => f.debug_struct("Value").field("ty", ty).finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Returned;
    use crate::access::InvokeError;
    use alloc::string::String;

    #[test]
    fn cursor_takes_in_order() {
        let mut cursor = args![3_u16, String::from("x")].into_cursor();

        assert_eq!(cursor.take::<u16>().unwrap(), 3);
        assert_eq!(cursor.take::<String>().unwrap(), "x");
        assert_eq!(cursor.remaining(), 0);
        assert!(matches!(
            cursor.take::<u8>(),
            Err(InvokeError::MissingArgument { index: 2 })
        ));
    }

    #[test]
    fn cursor_reports_wrong_type() {
        let mut cursor = args![1_i64].into_cursor();

        let err = cursor.take::<i32>().unwrap_err();
        assert!(matches!(err, InvokeError::ArgumentType { index: 0, .. }));
    }

    #[test]
    fn unit_is_not_a_value() {
        assert!(Returned::from_value(()).is_unit());

        let value = Returned::from_value(5_u8);
        assert!(!value.is_unit());
        assert_eq!(value.downcast_ref::<u8>(), Some(&5));

        let value = value.downcast::<i8>().unwrap_err();
        assert_eq!(value.downcast::<u8>().unwrap(), 5);
    }
}
