use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

/// A [`TypeId`] together with the type's name.
///
/// Two `Type`s are equal when their ids are equal; the name only serves
/// error messages.
///
/// # Examples
///
/// ```
/// use sg_reflect::info::Type;
///
/// let ty = Type::of::<u32>();
/// assert!(ty.is::<u32>());
/// assert_eq!(ty.path(), "u32");
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Returns the `Type` of `T`.
    #[inline]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type name, as given by [`core::any::type_name`].
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the name without its module path, e.g. `Vec<u8>` for
    /// `alloc::vec::Vec<u8>`.
    ///
    /// Only the outermost path is shortened.
    pub fn name(&self) -> &'static str {
        let end = self.path.find('<').unwrap_or(self.path.len());
        match self.path[..end].rfind("::") {
            Some(index) => &self.path[index + 2..],
            None => self.path,
        }
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::Type;
    use alloc::vec::Vec;

    #[test]
    fn name_strips_module_path() {
        assert_eq!(Type::of::<Vec<u8>>().name(), "Vec<u8>");
        assert_eq!(Type::of::<i32>().name(), "i32");
        assert_eq!(Type::of::<Type>().name(), "Type");
    }

    #[test]
    fn equality_uses_type_id() {
        assert_eq!(Type::of::<u8>(), Type::of::<u8>());
        assert_ne!(Type::of::<u8>(), Type::of::<i8>());
    }
}
