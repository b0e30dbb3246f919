use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::info::{Type, Visibility};

// -----------------------------------------------------------------------------
// Erased accessors

type Reader = Box<dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync>;
type Writer = Box<dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync>;
type Assigner = Box<dyn Fn(&mut dyn Any, Box<dyn Any>) -> Result<(), Box<dyn Any>> + Send + Sync>;

// Passing closures through these functions fixes their signatures to the
// higher-ranked form the boxes require.
#[inline(always)]
fn reader<F>(f: F) -> Reader
where
    F: Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

#[inline(always)]
fn writer<F>(f: F) -> Writer
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

// -----------------------------------------------------------------------------
// FieldInfo

/// A named field declared by one type.
///
/// The accessors take the *owner* as `dyn Any` and fail (return `None` or
/// hand the value back) when it is not the type the field was declared on.
///
/// # Examples
///
/// ```
/// use sg_reflect::info::{FieldInfo, Visibility};
///
/// struct Foo {
///     bar: u8,
/// }
///
/// let info = FieldInfo::new::<Foo, u8>("bar", Visibility::Private, |foo| &foo.bar, |foo| &mut foo.bar);
///
/// assert_eq!(info.name(), "bar");
/// assert!(info.ty().is::<u8>());
/// assert!(!info.visibility().is_public());
/// ```
pub struct FieldInfo {
    name: &'static str,
    visibility: Visibility,
    ty: Type,
    owner: Type,
    read: Reader,
    write: Writer,
    assign: Assigner,
}

impl FieldInfo {
    /// Creates the entry for field `name` of type `T` declared on `O`.
    pub fn new<O: Any, T: Any>(
        name: &'static str,
        visibility: Visibility,
        get: fn(&O) -> &T,
        get_mut: fn(&mut O) -> &mut T,
    ) -> Self {
        Self {
            name,
            visibility,
            ty: Type::of::<T>(),
            owner: Type::of::<O>(),
            read: reader(move |owner| owner.downcast_ref::<O>().map(|o| get(o) as &dyn Any)),
            write: writer(move |owner| {
                owner
                    .downcast_mut::<O>()
                    .map(|o| get_mut(o) as &mut dyn Any)
            }),
            assign: Box::new(
                move |owner: &mut dyn Any, value: Box<dyn Any>| -> Result<(), Box<dyn Any>> {
                    let value = value.downcast::<T>()?;
                    match owner.downcast_mut::<O>() {
                        Some(o) => {
                            *get_mut(o) = *value;
                            Ok(())
                        }
                        None => Err(value as Box<dyn Any>),
                    }
                },
            ),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns the field's declared type.
    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    /// Returns the type that declares this field.
    #[inline]
    pub const fn owner(&self) -> Type {
        self.owner
    }

    /// Reads the field from `owner`.
    #[inline]
    pub fn read<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.read)(owner)
    }

    /// Borrows the field mutably from `owner`.
    #[inline]
    pub fn read_mut<'a>(&self, owner: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.write)(owner)
    }

    /// Moves `value` into the field.
    ///
    /// `value` is handed back untouched if it is not of the field's type or
    /// `owner` is not the declaring type; `owner` is unchanged in that case.
    #[inline]
    pub fn assign(&self, owner: &mut dyn Any, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        (self.assign)(owner, value)
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("ty", &self.ty)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::FieldInfo;
    use crate::info::Visibility;
    use alloc::boxed::Box;
    use alloc::string::String;
    use core::any::Any;

    struct Foo {
        label: String,
    }

    fn label_info() -> FieldInfo {
        FieldInfo::new::<Foo, String>(
            "label",
            Visibility::Private,
            |foo| &foo.label,
            |foo| &mut foo.label,
        )
    }

    #[test]
    fn read_and_assign() {
        let info = label_info();
        let mut foo = Foo { label: String::from("old") };

        let value = info.read(&foo).unwrap().downcast_ref::<String>().unwrap();
        assert_eq!(value, "old");

        info.assign(&mut foo, Box::new(String::from("new"))).unwrap();
        assert_eq!(foo.label, "new");
    }

    #[test]
    fn assign_rejects_wrong_value_type() {
        let info = label_info();
        let mut foo = Foo { label: String::from("kept") };

        let rejected = info.assign(&mut foo, Box::new(7_u32)).unwrap_err();
        assert_eq!(rejected.downcast_ref::<u32>(), Some(&7));
        assert_eq!(foo.label, "kept");
    }

    #[test]
    fn wrong_owner_is_rejected() {
        let info = label_info();
        let mut other = 5_u8;

        assert!(info.read(&other as &dyn Any).is_none());
        assert!(info.read_mut(&mut other as &mut dyn Any).is_none());
    }
}
