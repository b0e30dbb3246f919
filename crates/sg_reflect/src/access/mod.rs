//! Name-based access to non-public instance members.
//!
//! Every operation resolves the name afresh, starting at the concrete type
//! of the instance and walking its [`ancestry`](crate::info::TypeInfo::ancestry)
//! most-derived first. Each type only contributes the members it declares
//! itself, so a derived declaration shadows any base declaration of the same
//! name. Public members never match.
//!
//! ## Menu
//!
//! - Fields: [`get_field`], [`get_field_as`], [`get_field_mut`], [`set_field`].
//! - Methods: [`invoke_method`] with an [`Args`] list (see [`args!`]),
//!   producing a [`Returned`]. [`invoke_method_ref`] runs `&self` methods
//!   on a shared borrow.
//! - [`PrivateAccess`]: the same operations in method-call form.
//! - [`resolve`]: what a name resolves to, as a [`MemberDescriptor`].
//! - [`AccessError`]: every failure. Errors are immediate and leave the
//!   instance untouched.
//!
//! ## Overloads
//!
//! Methods are matched by name only. When the first type on the chain that
//! declares the name declares it more than once, the call fails with
//! [`AccessError::AmbiguousMethod`] instead of picking one.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod args;
mod descriptor;
mod error;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use args::render_types;

pub use crate::args;
pub use accessor::{
    PrivateAccess, get_field, get_field_as, get_field_mut, invoke_method, invoke_method_ref, set_field,
};
pub use args::{Arg, ArgCursor, Args, Returned};
pub use descriptor::{Member, MemberDescriptor, MemberKind, resolve};
pub use error::{AccessError, InvokeError};
