use core::fmt;

/// The declared visibility of a field or method.
///
/// Lookups through [`access`](crate::access) only ever match members that
/// are not [`Public`](Visibility::Public).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `pub`
    Public,
    /// `pub(crate)`, `pub(super)`, `pub(in path)`
    Restricted,
    /// No visibility modifier.
    Private,
}

impl Visibility {
    #[inline]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.pad("public"),
            Self::Restricted => f.pad("restricted"),
            Self::Private => f.pad("private"),
        }
    }
}
