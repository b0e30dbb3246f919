//! Containers for static storage of descriptors.
//!
//! For non-generic types, [`NonGenericTypeInfoCell`] wraps a [`OnceLock`].
//!
//! For generic types a `static` inside the `type_info` function is shared by
//! every instantiation, so [`GenericTypeInfoCell`] keys its entries by
//! [`TypeId`]. Each entry is leaked once and lives for the rest of the
//! program.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;

/// Static storage for the descriptor of a non-generic type.
///
/// ```
/// use sg_reflect::info::{NonGenericTypeInfoCell, TypeInfo, Typed};
///
/// struct Plain;
///
/// impl Typed for Plain {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::builder::<Self>().build())
///     }
/// }
///
/// assert!(core::ptr::eq(Plain::type_info(), Plain::type_info()));
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored descriptor, building it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

/// Static storage for the descriptors of a generic type.
///
/// ```
/// use sg_reflect::info::{GenericTypeInfoCell, TypeInfo, Typed};
///
/// struct Wrapper<T>(T);
///
/// impl<T: 'static> Typed for Wrapper<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::builder::<Self>().build())
///     }
/// }
///
/// assert!(Wrapper::<u8>::type_info().ty().is::<Wrapper<u8>>());
/// assert!(Wrapper::<i8>::type_info().ty().is::<Wrapper<i8>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<BTreeMap<TypeId, &'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(BTreeMap::new()))
    }

    /// Returns the descriptor stored for `G`, building it with `f` when there
    /// is none yet.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            // Built without holding the lock: building may need other cells.
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}
