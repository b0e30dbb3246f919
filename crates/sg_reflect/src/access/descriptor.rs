use alloc::string::String;
use core::any::Any;
use core::fmt;

use crate::access::AccessError;
use crate::info::{FieldInfo, MethodInfo, TypeInfo};

// -----------------------------------------------------------------------------
// MemberKind

/// The two kinds of member a name can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Field => "field",
            Self::Method => "method",
        })
    }
}

// -----------------------------------------------------------------------------
// Member

/// The entry a name resolved to.
#[derive(Debug, Clone, Copy)]
pub enum Member {
    Field(&'static FieldInfo),
    Method(&'static MethodInfo),
}

impl Member {
    #[inline]
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Field(_) => MemberKind::Field,
            Self::Method(_) => MemberKind::Method,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Field(info) => info.name(),
            Self::Method(info) => info.name(),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One non-public member, located somewhere on a type's ancestor chain.
///
/// Built by [`resolve`] and only meant to live for a single access.
///
/// # Examples
///
/// ```
/// use sg_reflect::access::{MemberKind, resolve};
/// use sg_reflect::derive::Inspect;
/// use sg_reflect::info::Typed;
///
/// #[derive(Inspect)]
/// struct Engine {
///     rpm: u32,
/// }
///
/// #[derive(Inspect)]
/// struct Car {
///     #[inspect(base)]
///     engine: Engine,
/// }
///
/// let found = resolve(Car::type_info(), "rpm", MemberKind::Field).unwrap();
/// assert_eq!(found.declaring().ty().name(), "Engine");
/// assert_eq!(found.depth(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MemberDescriptor {
    origin: &'static TypeInfo,
    declaring: &'static TypeInfo,
    depth: usize,
    member: Member,
}

impl MemberDescriptor {
    /// Returns the most-derived type the lookup started from.
    #[inline]
    pub const fn origin(&self) -> &'static TypeInfo {
        self.origin
    }

    /// Returns the type that declares the member.
    #[inline]
    pub const fn declaring(&self) -> &'static TypeInfo {
        self.declaring
    }

    /// Returns how many base links separate the declaring type from the
    /// origin. `0` means the origin declares the member itself.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub const fn member(&self) -> Member {
        self.member
    }

    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.member.kind()
    }
}

// -----------------------------------------------------------------------------
// Located

/// A resolved entry of a known kind, with the way back to its receiver.
pub(crate) struct Located<M: 'static> {
    pub origin: &'static TypeInfo,
    pub declaring: &'static TypeInfo,
    pub depth: usize,
    pub entry: &'static M,
}

impl<M> Located<M> {
    fn receiver_mismatch(&self) -> AccessError {
        AccessError::ReceiverMismatch {
            expected: self.declaring.type_path(),
        }
    }

    /// Projects an instance of the origin type onto the declaring type.
    pub fn receiver<'a>(&self, instance: &'a dyn Any) -> Result<&'a dyn Any, AccessError> {
        let mut current = instance;
        for info in self.origin.ancestry().take(self.depth) {
            current = info
                .base()
                .and_then(|link| link.project(current))
                .ok_or_else(|| self.receiver_mismatch())?;
        }
        Ok(current)
    }

    pub fn receiver_mut<'a>(&self, instance: &'a mut dyn Any) -> Result<&'a mut dyn Any, AccessError> {
        let mut current = instance;
        for info in self.origin.ancestry().take(self.depth) {
            let Some(link) = info.base() else {
                return Err(self.receiver_mismatch());
            };
            current = link
                .project_mut(current)
                .ok_or_else(|| self.receiver_mismatch())?;
        }
        Ok(current)
    }
}

fn not_found(origin: &TypeInfo, name: &str, kind: MemberKind) -> AccessError {
    AccessError::MemberNotFound {
        kind,
        name: String::from(name),
        type_path: origin.type_path(),
    }
}

pub(crate) fn find_field(
    origin: &'static TypeInfo,
    name: &str,
) -> Result<Located<FieldInfo>, AccessError> {
    for (depth, info) in origin.ancestry().enumerate() {
        let found = info
            .fields()
            .iter()
            .find(|field| field.name() == name && !field.visibility().is_public());

        if let Some(entry) = found {
            log::trace!(
                "field `{name}` of `{}` resolved on `{}` at depth {depth}",
                origin.type_path(),
                info.type_path(),
            );
            return Ok(Located {
                origin,
                declaring: info,
                depth,
                entry,
            });
        }
    }

    Err(not_found(origin, name, MemberKind::Field))
}

pub(crate) fn find_method(
    origin: &'static TypeInfo,
    name: &str,
) -> Result<Located<MethodInfo>, AccessError> {
    for (depth, info) in origin.ancestry().enumerate() {
        let mut candidates = info
            .declared_methods(name)
            .filter(|method| !method.visibility().is_public());

        let Some(entry) = candidates.next() else {
            continue;
        };

        let others = candidates.count();
        if others > 0 {
            return Err(AccessError::AmbiguousMethod {
                name: String::from(name),
                declaring: info.type_path(),
                count: others + 1,
            });
        }

        log::trace!(
            "method `{name}` of `{}` resolved on `{}` at depth {depth}",
            origin.type_path(),
            info.type_path(),
        );
        return Ok(Located {
            origin,
            declaring: info,
            depth,
            entry,
        });
    }

    Err(not_found(origin, name, MemberKind::Method))
}

/// Resolves `name` to a non-public member of `origin` or one of its
/// ancestors.
///
/// The chain is walked most-derived first and each type only contributes
/// what it declares, so the first declaration found shadows any further up.
/// Public members never match.
///
/// # Errors
///
/// - [`AccessError::MemberNotFound`] when no type on the chain declares a
///   matching member.
/// - [`AccessError::AmbiguousMethod`] when the first declaring type has
///   several methods with that name.
pub fn resolve(
    origin: &'static TypeInfo,
    name: &str,
    kind: MemberKind,
) -> Result<MemberDescriptor, AccessError> {
    match kind {
        MemberKind::Field => find_field(origin, name).map(|found| MemberDescriptor {
            origin: found.origin,
            declaring: found.declaring,
            depth: found.depth,
            member: Member::Field(found.entry),
        }),
        MemberKind::Method => find_method(origin, name).map(|found| MemberDescriptor {
            origin: found.origin,
            declaring: found.declaring,
            depth: found.depth,
            member: Member::Method(found.entry),
        }),
    }
}
