use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::info::{FieldInfo, MethodInfo, Type, Typed, Visibility};

// -----------------------------------------------------------------------------
// BaseLink

type Projector = Box<dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync>;
type ProjectorMut = Box<dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync>;

#[inline(always)]
fn projector<F>(f: F) -> Projector
where
    F: Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

#[inline(always)]
fn projector_mut<F>(f: F) -> ProjectorMut
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync + 'static,
{
    Box::new(f)
}

/// The link from a type to the type it extends.
///
/// Rust has no inheritance, so a "derived" struct embeds its "base" as a
/// field. The link records which field that is and how to reach it.
pub struct BaseLink {
    field: &'static str,
    // `TypeInfo` is created on first access; using a function pointer delays it.
    info: fn() -> &'static TypeInfo,
    project: Projector,
    project_mut: ProjectorMut,
}

impl BaseLink {
    /// Returns the name of the embedding field.
    #[inline]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the base type's [`TypeInfo`].
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    /// Projects an instance of the derived type onto its base.
    #[inline]
    pub fn project<'a>(&self, derived: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.project)(derived)
    }

    #[inline]
    pub fn project_mut<'a>(&self, derived: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.project_mut)(derived)
    }
}

impl fmt::Debug for BaseLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLink")
            .field("field", &self.field)
            .field("base", &self.info().ty())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// The runtime descriptor of one type.
///
/// A descriptor only lists what its type *declares*. Members of the base
/// type live in the base's own descriptor, reachable through
/// [`base`](Self::base); walking [`ancestry`](Self::ancestry) visits every
/// descriptor from the most-derived type to the root.
///
/// # Examples
///
/// ```
/// use sg_reflect::derive::Inspect;
/// use sg_reflect::info::Typed;
///
/// #[derive(Inspect)]
/// struct Shape {
///     sides: u32,
/// }
///
/// #[derive(Inspect)]
/// struct Square {
///     #[inspect(base)]
///     shape: Shape,
///     side: f32,
/// }
///
/// let names: Vec<_> = Square::type_info().ancestry().map(|info| info.ty().name()).collect();
/// assert_eq!(names, ["Square", "Shape"]);
/// ```
pub struct TypeInfo {
    ty: Type,
    fields: Box<[FieldInfo]>,
    methods: Box<[MethodInfo]>,
    base: Option<BaseLink>,
}

impl TypeInfo {
    /// Starts a descriptor for `T`.
    #[inline]
    pub fn builder<T: Any>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder {
            fields: Vec::new(),
            methods: Vec::new(),
            base: None,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    /// Shorthand for `self.ty().path()`.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    /// Returns the fields this type declares, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Returns the methods this type declares, in declaration order.
    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    #[inline]
    pub fn base(&self) -> Option<&BaseLink> {
        self.base.as_ref()
    }

    /// Returns the field named `name` declared by this type, if any.
    ///
    /// Inherited fields are not considered.
    pub fn declared_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns every method named `name` declared by this type.
    ///
    /// Inherited methods are not considered.
    pub fn declared_methods<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a MethodInfo> {
        self.methods.iter().filter(move |method| method.name() == name)
    }

    /// Returns the descriptor chain starting at this type.
    #[inline]
    pub fn ancestry(&self) -> Ancestry<'_> {
        Ancestry { next: Some(self) }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("ty", &self.ty)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("base", &self.base)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Ancestry

/// Iterator over a descriptor and the descriptors of its base types,
/// most-derived first.
///
/// Created by [`TypeInfo::ancestry`].
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    next: Option<&'a TypeInfo>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.base().map(BaseLink::info);
        Some(current)
    }
}

impl core::iter::FusedIterator for Ancestry<'_> {}

// -----------------------------------------------------------------------------
// TypeInfoBuilder

/// Typed builder for [`TypeInfo`].
///
/// # Examples
///
/// ```
/// use sg_reflect::info::{NonGenericTypeInfoCell, TypeInfo, Typed, Visibility};
///
/// struct Gauge {
///     level: u8,
/// }
///
/// impl Typed for Gauge {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::builder::<Self>()
///                 .field::<u8>("level", Visibility::Private, |g| &g.level, |g| &mut g.level)
///                 .build()
///         })
///     }
/// }
///
/// assert!(Gauge::type_info().declared_field("level").is_some());
/// ```
pub struct TypeInfoBuilder<T> {
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    base: Option<BaseLink>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> TypeInfoBuilder<T> {
    /// Declares a field.
    pub fn field<F: Any>(
        mut self,
        name: &'static str,
        visibility: Visibility,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.fields
            .push(FieldInfo::new::<T, F>(name, visibility, get, get_mut));
        self
    }

    /// Declares `field` as the embedded base type.
    ///
    /// A later call replaces an earlier one.
    pub fn base<B: Typed>(
        mut self,
        field: &'static str,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.base = Some(BaseLink {
            field,
            info: B::type_info,
            project: projector(move |derived| {
                derived.downcast_ref::<T>().map(|d| get(d) as &dyn Any)
            }),
            project_mut: projector_mut(move |derived| {
                derived
                    .downcast_mut::<T>()
                    .map(|d| get_mut(d) as &mut dyn Any)
            }),
        });
        self
    }

    /// Declares a method.
    pub fn method(mut self, method: MethodInfo) -> Self {
        if !method.owner().is::<T>() {
            log::warn!(
                "method `{}` declared for `{}` is registered on `{}`",
                method.name(),
                method.owner(),
                core::any::type_name::<T>(),
            );
        }
        self.methods.push(method);
        self
    }

    /// Declares several methods.
    pub fn methods(self, methods: impl IntoIterator<Item = MethodInfo>) -> Self {
        methods.into_iter().fold(self, Self::method)
    }

    pub fn build(self) -> TypeInfo {
        TypeInfo {
            ty: Type::of::<T>(),
            fields: self.fields.into_boxed_slice(),
            methods: self.methods.into_boxed_slice(),
            base: self.base,
        }
    }
}
