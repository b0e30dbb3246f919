use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use crate::access::{ArgCursor, Args, InvokeError, Returned};
use crate::info::{Type, Visibility};

type RefInvoker = Box<dyn Fn(&dyn Any, ArgCursor) -> Result<Returned, InvokeError> + Send + Sync>;
type MutInvoker = Box<dyn Fn(&mut dyn Any, ArgCursor) -> Result<Returned, InvokeError> + Send + Sync>;

enum Invoker {
    Ref(RefInvoker),
    Mut(MutInvoker),
}

/// How a method borrows its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// `&self`
    Ref,
    /// `&mut self`
    Mut,
}

/// A method declared by one type.
///
/// Only methods with a `&self` or `&mut self` receiver can be described,
/// through [`new_ref`](Self::new_ref) and [`new`](Self::new) respectively.
/// Arguments reach the method through an [`ArgCursor`], in declaration order.
///
/// # Examples
///
/// ```
/// use sg_reflect::access::{Returned, args};
/// use sg_reflect::info::{MethodInfo, Receiver, Type, Visibility};
///
/// struct Acc(i64);
///
/// impl Acc {
///     fn add(&mut self, n: i64) -> i64 {
///         self.0 += n;
///         self.0
///     }
/// }
///
/// let info = MethodInfo::new::<Acc>("add", Visibility::Private, |this, mut args| {
///     let n = args.take::<i64>()?;
///     Ok(Returned::from_value(this.add(n)))
/// })
/// .with_params([Type::of::<i64>()])
/// .with_return(Type::of::<i64>());
/// assert_eq!(info.receiver(), Receiver::Mut);
///
/// let mut acc = Acc(1);
/// let out = info.call(&mut acc, args![2_i64]).unwrap();
/// assert_eq!(out.downcast_ref::<i64>(), Some(&3));
///
/// // A `&mut self` method cannot run on a shared borrow.
/// assert!(info.call_ref(&acc, args![2_i64]).is_err());
/// ```
pub struct MethodInfo {
    name: &'static str,
    visibility: Visibility,
    owner: Type,
    params: Box<[Type]>,
    ret: Type,
    invoker: Invoker,
}

impl MethodInfo {
    /// Creates the entry for the `&mut self` method `name` declared on `O`.
    ///
    /// The entry starts with no parameters and a `()` return type; see
    /// [`with_params`](Self::with_params) and [`with_return`](Self::with_return).
    pub fn new<O: Any>(
        name: &'static str,
        visibility: Visibility,
        invoke: fn(&mut O, ArgCursor) -> Result<Returned, InvokeError>,
    ) -> Self {
        let invoker: MutInvoker = Box::new(move |owner: &mut dyn Any, args: ArgCursor| {
            match owner.downcast_mut::<O>() {
                Some(owner) => invoke(owner, args),
                None => Err(InvokeError::Receiver),
            }
        });
        Self::with_invoker::<O>(name, visibility, Invoker::Mut(invoker))
    }

    /// Creates the entry for the `&self` method `name` declared on `O`.
    pub fn new_ref<O: Any>(
        name: &'static str,
        visibility: Visibility,
        invoke: fn(&O, ArgCursor) -> Result<Returned, InvokeError>,
    ) -> Self {
        let invoker: RefInvoker = Box::new(move |owner: &dyn Any, args: ArgCursor| {
            match owner.downcast_ref::<O>() {
                Some(owner) => invoke(owner, args),
                None => Err(InvokeError::Receiver),
            }
        });
        Self::with_invoker::<O>(name, visibility, Invoker::Ref(invoker))
    }

    fn with_invoker<O: Any>(name: &'static str, visibility: Visibility, invoker: Invoker) -> Self {
        Self {
            name,
            visibility,
            owner: Type::of::<O>(),
            params: Box::new([]),
            ret: Type::of::<()>(),
            invoker,
        }
    }

    /// Sets the parameter types, in declaration order.
    #[inline]
    pub fn with_params(self, params: impl Into<Box<[Type]>>) -> Self {
        Self {
            params: params.into(),
            ..self
        }
    }

    /// Sets the return type. For methods returning `Result<T, E>` this is `T`.
    #[inline]
    pub fn with_return(self, ret: Type) -> Self {
        Self { ret, ..self }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub const fn receiver(&self) -> Receiver {
        match self.invoker {
            Invoker::Ref(_) => Receiver::Ref,
            Invoker::Mut(_) => Receiver::Mut,
        }
    }

    /// Returns the type that declares this method.
    #[inline]
    pub const fn owner(&self) -> Type {
        self.owner
    }

    #[inline]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    #[inline]
    pub const fn ret(&self) -> Type {
        self.ret
    }

    /// Returns `true` if `args` has exactly the declared parameter types.
    pub fn accepts(&self, args: &Args) -> bool {
        args.len() == self.params.len()
            && args.types().zip(self.params.iter()).all(|(arg, param)| arg == *param)
    }

    /// Renders the parameter list as `(T0, T1, ..)`.
    pub fn signature(&self) -> String {
        crate::access::render_types(self.params.iter().copied())
    }

    /// Runs the method with `owner` as receiver. Works for both receivers.
    ///
    /// `args` is not checked against [`params`](Self::params) up front; use
    /// [`accepts`](Self::accepts) first to guarantee the body is not entered
    /// with bad arguments.
    pub fn call(&self, owner: &mut dyn Any, args: Args) -> Result<Returned, InvokeError> {
        match &self.invoker {
            Invoker::Ref(invoker) => invoker(&*owner, args.into_cursor()),
            Invoker::Mut(invoker) => invoker(owner, args.into_cursor()),
        }
    }

    /// Runs a `&self` method with a shared `owner`.
    ///
    /// Fails with [`InvokeError::MutableReceiver`] for `&mut self` methods.
    pub fn call_ref(&self, owner: &dyn Any, args: Args) -> Result<Returned, InvokeError> {
        match &self.invoker {
            Invoker::Ref(invoker) => invoker(owner, args.into_cursor()),
            Invoker::Mut(_) => Err(InvokeError::MutableReceiver),
        }
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("receiver", &self.receiver())
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .finish_non_exhaustive()
    }
}
