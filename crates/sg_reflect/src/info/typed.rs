use core::any::Any;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to a type's runtime descriptor.
///
/// Implemented by [`#[derive(Inspect)]`](crate::derive::Inspect). Manual
/// implementations build the descriptor once inside a static cell, see
/// [`TypeInfoBuilder`](crate::info::TypeInfoBuilder).
pub trait Typed: Any {
    /// Returns the descriptor of `Self`.
    ///
    /// Note: Use [`Inspect`] for dynamic dispatch.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// Inspect

/// Dynamic access to the descriptor of a value's concrete type.
///
/// Implemented for every [`Typed`] type. Through `&dyn Inspect` (or
/// `Box<dyn Inspect>`) the descriptor is that of the concrete, most-derived
/// type behind the pointer.
///
/// # Examples
///
/// ```
/// use sg_reflect::{Inspect, derive::Inspect};
///
/// #[derive(Inspect)]
/// struct A {
///     value: u64,
/// }
///
/// let a: Box<dyn Inspect> = Box::new(A { value: 1 });
/// assert_eq!(a.inspect_type_info().ty().name(), "A");
/// ```
pub trait Inspect: Any {
    fn inspect_type_info(&self) -> &'static TypeInfo;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Typed> Inspect for T {
    #[inline]
    fn inspect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
