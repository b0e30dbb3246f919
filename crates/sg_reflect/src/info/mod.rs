//! Runtime type descriptors.
//!
//! ## Menu
//!
//! - [`Type`]: a `TypeId` paired with the type's name, used for diagnostics.
//!
//! - [`Visibility`]: the declared visibility of a member. Only non-public
//!   members take part in [`access`](crate::access) lookups.
//!
//! - [`FieldInfo`]: a single named field owned by one type, with type-erased
//!   read, write and assignment hooks.
//!
//! - [`MethodInfo`]: a single `&self`/`&mut self` method owned by one type,
//!   with its parameter list and a type-erased invoker.
//!
//! - [`TypeInfo`]: everything one type *declares* (its own fields and
//!   methods) plus an optional [`BaseLink`] to the type it extends.
//!     - [`TypeInfo::ancestry`]: the descriptor chain, most-derived first.
//!     - [`TypeInfoBuilder`]: the typed builder used by the derive and by
//!       hand-written descriptors.
//!
//! - [`Typed`]: static access to a type's descriptor.
//!
//! - [`Inspect`]: dynamic access to the descriptor of a value's concrete type.
//!
//! - [`NonGenericTypeInfoCell`] / [`GenericTypeInfoCell`]: static storage
//!   for descriptors.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod field_info;
mod method_info;
mod ty;
mod type_info;
mod typed;
mod visibility;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use field_info::FieldInfo;
pub use method_info::{MethodInfo, Receiver};
pub use ty::Type;
pub use type_info::{Ancestry, BaseLink, TypeInfo, TypeInfoBuilder};
pub use typed::{Inspect, Typed};
pub use visibility::Visibility;
