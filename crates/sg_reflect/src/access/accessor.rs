use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::Any;

use crate::access::descriptor::{find_field, find_method};
use crate::access::{AccessError, Args, InvokeError, Returned};
use crate::info::{Inspect, MethodInfo, Receiver, Type};

// -----------------------------------------------------------------------------
// Fields

/// Reads the non-public field `name` of `instance`.
///
/// The lookup starts at the concrete type of `instance` and walks its
/// ancestors; see [`resolve`](crate::access::resolve).
///
/// # Examples
///
/// ```
/// use sg_reflect::access::get_field;
/// use sg_reflect::derive::Inspect;
///
/// #[derive(Inspect)]
/// struct Secret {
///     code: u16,
/// }
///
/// let secret = Secret { code: 42 };
/// let code = get_field(&secret, "code").unwrap();
/// assert_eq!(code.downcast_ref::<u16>(), Some(&42));
/// ```
pub fn get_field<'a, I>(instance: &'a I, name: &str) -> Result<&'a dyn Any, AccessError>
where
    I: Inspect + ?Sized,
{
    let found = find_field(instance.inspect_type_info(), name)?;
    let owner = found.receiver(instance.as_any())?;
    found
        .entry
        .read(owner)
        .ok_or(AccessError::ReceiverMismatch {
            expected: found.declaring.type_path(),
        })
}

/// Reads the non-public field `name` of `instance` as a `T`.
///
/// Fails with [`AccessError::FieldTypeMismatch`] if the field is not a `T`.
pub fn get_field_as<'a, T, I>(instance: &'a I, name: &str) -> Result<&'a T, AccessError>
where
    T: Any,
    I: Inspect + ?Sized,
{
    let value = get_field(instance, name)?;
    value.downcast_ref::<T>().ok_or_else(|| {
        // `get_field` succeeded, so a second lookup finds the same entry.
        let actual = find_field(instance.inspect_type_info(), name)
            .map(|found| (found.entry.ty(), found.declaring.type_path()));
        match actual {
            Ok((actual, declaring)) => AccessError::FieldTypeMismatch {
                name: String::from(name),
                declaring,
                actual,
                requested: Type::of::<T>(),
            },
            Err(err) => err,
        }
    })
}

/// Borrows the non-public field `name` of `instance` mutably.
pub fn get_field_mut<'a, I>(instance: &'a mut I, name: &str) -> Result<&'a mut dyn Any, AccessError>
where
    I: Inspect + ?Sized,
{
    let found = find_field(instance.inspect_type_info(), name)?;
    let expected = found.declaring.type_path();
    let owner = found.receiver_mut(instance.as_any_mut())?;
    found
        .entry
        .read_mut(owner)
        .ok_or(AccessError::ReceiverMismatch { expected })
}

/// Overwrites the non-public field `name` of `instance` with `value`.
///
/// `T` must be exactly the declared type of the field. On any error
/// `instance` is left unchanged.
///
/// # Examples
///
/// ```
/// use sg_reflect::access::{get_field_as, set_field};
/// use sg_reflect::derive::Inspect;
///
/// #[derive(Inspect)]
/// struct Slot {
///     label: String,
/// }
///
/// let mut slot = Slot { label: String::from("a") };
/// set_field(&mut slot, "label", String::from("b")).unwrap();
/// assert_eq!(get_field_as::<String, _>(&slot, "label").unwrap(), "b");
///
/// // `&str` is not a `String`.
/// assert!(set_field(&mut slot, "label", "c").is_err());
/// ```
pub fn set_field<T, I>(instance: &mut I, name: &str, value: T) -> Result<(), AccessError>
where
    T: Any,
    I: Inspect + ?Sized,
{
    let found = find_field(instance.inspect_type_info(), name)?;
    let declaring = found.declaring.type_path();

    let found_ty = Type::of::<T>();
    if found.entry.ty() != found_ty {
        return Err(AccessError::InvalidAssignment {
            name: String::from(name),
            declaring,
            expected: found.entry.ty(),
            found: found_ty,
        });
    }

    let owner = found.receiver_mut(instance.as_any_mut())?;
    found
        .entry
        .assign(owner, Box::new(value))
        .map_err(|_| AccessError::ReceiverMismatch { expected: declaring })
}

// -----------------------------------------------------------------------------
// Methods

/// Invokes the non-public method `name` on `instance` with `args`.
///
/// The method is matched by name only. `args` must then have exactly the
/// declared parameter types, or the call fails with
/// [`AccessError::ArgumentMismatch`] before the method runs.
///
/// # Examples
///
/// ```
/// use sg_reflect::access::{args, invoke_method};
/// use sg_reflect::derive::{Inspect, inspect_methods};
///
/// #[derive(Inspect)]
/// #[inspect(methods)]
/// struct Adder {
///     total: i64,
/// }
///
/// #[inspect_methods]
/// impl Adder {
///     fn add(&mut self, n: i64) -> i64 {
///         self.total += n;
///         self.total
///     }
/// }
///
/// let mut adder = Adder { total: 1 };
/// let out = invoke_method(&mut adder, "add", args![41_i64]).unwrap();
/// assert_eq!(out.downcast::<i64>().ok(), Some(42));
/// ```
pub fn invoke_method<I>(instance: &mut I, name: &str, args: Args) -> Result<Returned, AccessError>
where
    I: Inspect + ?Sized,
{
    let found = find_method(instance.inspect_type_info(), name)?;
    let method = found.entry;
    let declaring = found.declaring.type_path();
    check_arguments(method, name, declaring, &args)?;

    let owner = found.receiver_mut(instance.as_any_mut())?;
    method
        .call(owner, args)
        .map_err(|err| invocation_error(method, name, declaring, err))
}

/// Invokes the non-public `&self` method `name` on a shared `instance`.
///
/// Resolution is the same as for [`invoke_method`]. When the name resolves
/// to a `&mut self` method the call fails with
/// [`AccessError::MutableReceiver`] and the method does not run.
///
/// # Examples
///
/// ```
/// use sg_reflect::access::{args, invoke_method_ref};
/// use sg_reflect::derive::{Inspect, inspect_methods};
///
/// #[derive(Inspect)]
/// #[inspect(methods)]
/// struct Gauge {
///     level: u8,
/// }
///
/// #[inspect_methods]
/// impl Gauge {
///     fn read(&self) -> u8 {
///         self.level
///     }
///
///     fn bump(&mut self) {
///         self.level += 1;
///     }
/// }
///
/// let gauge = Gauge { level: 3 };
/// let out = invoke_method_ref(&gauge, "read", args![]).unwrap();
/// assert_eq!(out.downcast_ref::<u8>(), Some(&3));
/// assert!(invoke_method_ref(&gauge, "bump", args![]).is_err());
/// ```
pub fn invoke_method_ref<I>(instance: &I, name: &str, args: Args) -> Result<Returned, AccessError>
where
    I: Inspect + ?Sized,
{
    let found = find_method(instance.inspect_type_info(), name)?;
    let method = found.entry;
    let declaring = found.declaring.type_path();

    if method.receiver() == Receiver::Mut {
        return Err(AccessError::MutableReceiver {
            name: String::from(name),
            declaring,
        });
    }
    check_arguments(method, name, declaring, &args)?;

    let owner = found.receiver(instance.as_any())?;
    method
        .call_ref(owner, args)
        .map_err(|err| invocation_error(method, name, declaring, err))
}

fn check_arguments(
    method: &MethodInfo,
    name: &str,
    declaring: &'static str,
    args: &Args,
) -> Result<(), AccessError> {
    if method.accepts(args) {
        return Ok(());
    }
    Err(AccessError::ArgumentMismatch {
        name: String::from(name),
        declaring,
        expected: method.signature(),
        found: args.signature(),
    })
}

fn invocation_error(method: &MethodInfo, name: &str, declaring: &'static str, err: InvokeError) -> AccessError {
    match err {
        InvokeError::Raised(source) => AccessError::Invocation {
            name: String::from(name),
            declaring,
            source,
        },
        InvokeError::MissingArgument { .. } | InvokeError::ArgumentType { .. } => {
            AccessError::ArgumentMismatch {
                name: String::from(name),
                declaring,
                expected: method.signature(),
                found: err.to_string(),
            }
        }
        InvokeError::MutableReceiver => AccessError::MutableReceiver {
            name: String::from(name),
            declaring,
        },
        InvokeError::Receiver => AccessError::ReceiverMismatch {
            expected: declaring,
        },
    }
}

// -----------------------------------------------------------------------------
// PrivateAccess

/// Method-call syntax for the free functions of this module.
///
/// Implemented for every [`Inspect`] type, including `dyn Inspect`.
///
/// ```
/// use sg_reflect::PrivateAccess;
/// use sg_reflect::derive::Inspect;
///
/// #[derive(Inspect)]
/// struct Flag {
///     on: bool,
/// }
///
/// let mut flag = Flag { on: false };
/// flag.set_private("on", true).unwrap();
/// assert_eq!(flag.get_private_as::<bool>("on").ok(), Some(&true));
/// ```
pub trait PrivateAccess: Inspect {
    /// See [`get_field`].
    fn get_private(&self, name: &str) -> Result<&dyn Any, AccessError> {
        get_field(self, name)
    }

    /// See [`get_field_as`].
    fn get_private_as<T: Any>(&self, name: &str) -> Result<&T, AccessError> {
        get_field_as::<T, Self>(self, name)
    }

    /// See [`get_field_mut`].
    fn get_private_mut(&mut self, name: &str) -> Result<&mut dyn Any, AccessError> {
        get_field_mut(self, name)
    }

    /// See [`set_field`].
    fn set_private<T: Any>(&mut self, name: &str, value: T) -> Result<(), AccessError> {
        set_field(self, name, value)
    }

    /// See [`invoke_method`].
    fn invoke_private(&mut self, name: &str, args: Args) -> Result<Returned, AccessError> {
        invoke_method(self, name, args)
    }

    /// See [`invoke_method_ref`].
    fn invoke_private_ref(&self, name: &str, args: Args) -> Result<Returned, AccessError> {
        invoke_method_ref(self, name, args)
    }
}

impl<T: Inspect + ?Sized> PrivateAccess for T {}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use core::error::Error;
    use core::fmt;

    use core::any::Any;
    use core::panic::AssertUnwindSafe;
    use std::panic;

    use super::{get_field, get_field_as, get_field_mut, invoke_method, invoke_method_ref, set_field};
    use crate::access::{AccessError, Member, MemberKind, Returned};
    use crate::derive::{Inspect, inspect_methods};
    use crate::info::{Inspect, MethodInfo, NonGenericTypeInfoCell, Receiver, TypeInfo, Typed, Visibility};
    use crate::{PrivateAccess, args};

    // -------------------------------------------------------------------------
    // Fixtures

    #[derive(Inspect)]
    #[inspect(methods)]
    struct Counter {
        _count: i32,
    }

    #[inspect_methods]
    impl Counter {
        fn increment(&mut self) {
            self._count += 1;
        }

        fn peek(&self) -> i32 {
            self._count
        }
    }

    #[derive(Inspect)]
    #[inspect(methods)]
    struct Base {
        x: u8,
        label: String,
    }

    #[inspect_methods]
    impl Base {
        fn describe(&self) -> String {
            String::from("base")
        }

        fn scaled(&self, factor: u8) -> u8 {
            self.x * factor
        }
    }

    #[derive(Inspect)]
    #[inspect(methods)]
    struct Middle {
        #[inspect(base)]
        base: Base,
        x: u16,
    }

    #[inspect_methods]
    impl Middle {
        fn describe(&self) -> String {
            String::from("middle")
        }
    }

    #[derive(Inspect)]
    struct Leaf {
        #[inspect(base)]
        middle: Middle,
        pub label: String,
        #[inspect(skip)]
        hidden: bool,
    }

    fn leaf() -> Leaf {
        Leaf {
            middle: Middle {
                base: Base {
                    x: 3,
                    label: String::from("base label"),
                },
                x: 300,
            },
            label: String::from("public label"),
            hidden: true,
        }
    }

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("refused")
        }
    }

    impl Error for Refused {}

    #[derive(Inspect)]
    #[inspect(methods)]
    struct Gate {
        opened: u32,
    }

    #[inspect_methods]
    impl Gate {
        fn open(&mut self, allowed: bool) -> Result<u32, Refused> {
            if !allowed {
                return Err(Refused);
            }
            self.opened += 1;
            Ok(self.opened)
        }

        pub fn visible(&self) -> u32 {
            self.opened
        }
    }

    #[derive(Inspect)]
    #[inspect(methods)]
    struct Fuse {
        blown: bool,
    }

    #[inspect_methods]
    impl Fuse {
        fn blow(&mut self) {
            self.blown = true;
            panic!("fuse blown");
        }
    }

    #[derive(Inspect)]
    #[inspect(methods)]
    struct Holder<T> {
        value: T,
    }

    #[inspect_methods]
    impl<T: 'static> Holder<T> {
        fn replace(&mut self, value: T) -> T {
            core::mem::replace(&mut self.value, value)
        }
    }

    #[derive(Inspect)]
    #[inspect(methods)]
    struct Wrap<T> {
        #[inspect(base)]
        inner: Holder<T>,
        tag: u8,
    }

    #[inspect_methods]
    impl<T: 'static> Wrap<T> {
        fn tag(&self) -> u8 {
            self.tag
        }
    }

    // -------------------------------------------------------------------------
    // Tests

    #[test]
    fn counter_scenario() {
        let mut counter = Counter { _count: 0 };

        set_field(&mut counter, "_count", 10_i32).unwrap();
        let out = invoke_method(&mut counter, "increment", args![]).unwrap();

        assert!(out.is_unit());
        assert_eq!(get_field_as::<i32, _>(&counter, "_count").unwrap(), &11);
        assert_eq!(counter.peek(), 11);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut leaf = leaf();

        set_field(&mut leaf, "label", String::from("new")).unwrap();
        assert_eq!(get_field_as::<String, _>(&leaf, "label").unwrap(), "new");
        assert_eq!(leaf.middle.base.label, "new");
    }

    #[test]
    fn derived_field_shadows_base() {
        let mut leaf = leaf();

        assert_eq!(get_field_as::<u16, _>(&leaf, "x").unwrap(), &300);

        set_field(&mut leaf, "x", 7_u16).unwrap();
        assert_eq!(leaf.middle.x, 7);
        assert_eq!(leaf.middle.base.x, 3);

        // The base's `u8` is never reached through the shadowing name.
        let err = set_field(&mut leaf, "x", 1_u8).unwrap_err();
        assert!(matches!(err, AccessError::InvalidAssignment { .. }));
        assert_eq!(leaf.middle.base.x, 3);
    }

    #[test]
    fn reaches_three_levels_up() {
        let mut leaf = leaf();

        let found = crate::access::resolve(Leaf::type_info(), "label", MemberKind::Field).unwrap();
        assert_eq!(found.depth(), 2);
        assert!(found.declaring().ty().is::<Base>());

        let label = get_field_mut(&mut leaf, "label").unwrap();
        *label.downcast_mut::<String>().unwrap() = String::from("edited");
        assert_eq!(leaf.middle.base.label, "edited");
        assert_eq!(leaf.label, "public label");
    }

    #[test]
    fn public_and_skipped_fields_are_not_found() {
        #[derive(Inspect)]
        struct Open {
            pub shown: u8,
            #[inspect(skip)]
            skipped: u8,
        }

        let open = Open { shown: 1, skipped: 2 };
        assert_eq!(open.shown + open.skipped, 3);

        for name in ["shown", "skipped", "Shown"] {
            let err = get_field(&open, name).unwrap_err();
            assert!(err.is_not_found(), "{name}: {err}");
        }

        let leaf = leaf();
        assert!(leaf.hidden);
        assert!(get_field(&leaf, "hidden").unwrap_err().is_not_found());
    }

    #[test]
    fn not_found_names_the_origin() {
        let mut leaf = leaf();

        let err = invoke_method(&mut leaf, "missing", args![]).unwrap_err();
        match err {
            AccessError::MemberNotFound {
                kind,
                name,
                type_path,
            } => {
                assert_eq!(kind, MemberKind::Method);
                assert_eq!(name, "missing");
                assert!(type_path.ends_with("Leaf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_field_set_keeps_instance() {
        let mut leaf = leaf();

        let err = set_field(&mut leaf, "nope", 1_u8).unwrap_err();
        match err {
            AccessError::MemberNotFound { kind, name, .. } => {
                assert_eq!(kind, MemberKind::Field);
                assert_eq!(name, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(leaf.set_private("Label", String::from("x")).unwrap_err().is_not_found());
        assert_eq!(leaf.middle.base.label, "base label");
        assert_eq!(leaf.middle.base.x, 3);
        assert_eq!(leaf.middle.x, 300);
        assert_eq!(leaf.label, "public label");
    }

    #[test]
    fn wrong_type_set_keeps_value() {
        let mut counter = Counter { _count: 5 };

        let err = set_field(&mut counter, "_count", 6_i64).unwrap_err();
        assert!(matches!(err, AccessError::InvalidAssignment { .. }));
        assert_eq!(counter._count, 5);

        let err = get_field_as::<i64, _>(&counter, "_count").unwrap_err();
        assert!(matches!(err, AccessError::FieldTypeMismatch { .. }));
    }

    #[test]
    fn methods_shadow_and_inherit() {
        let mut middle = Middle {
            base: Base {
                x: 4,
                label: String::new(),
            },
            x: 0,
        };

        let out = invoke_method(&mut middle, "describe", args![]).unwrap();
        assert_eq!(out.downcast::<String>().ok().as_deref(), Some("middle"));

        let out = invoke_method(&mut middle, "scaled", args![2_u8]).unwrap();
        assert_eq!(out.downcast_ref::<u8>(), Some(&8));
    }

    #[test]
    fn dyn_inspect_uses_concrete_type() {
        let mut boxed: Box<dyn Inspect> = Box::new(Counter { _count: 1 });

        boxed.invoke_private("increment", args![]).unwrap();
        assert_eq!(boxed.get_private_as::<i32>("_count").ok(), Some(&2));

        let value = boxed.invoke_private("peek", args![]).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn errors_from_the_method_are_kept_as_source() {
        let mut gate = Gate { opened: 0 };

        let out = invoke_method(&mut gate, "open", args![true]).unwrap();
        assert_eq!(out.downcast_ref::<u32>(), Some(&1));

        let err = invoke_method(&mut gate, "open", args![false]).unwrap_err();
        assert!(matches!(err, AccessError::Invocation { .. }));
        let source = err.source().unwrap();
        assert!(source.is::<Refused>());
        assert_eq!(source.to_string(), "refused");
        assert_eq!(gate.opened, 1);

        assert!(invoke_method(&mut gate, "visible", args![]).unwrap_err().is_not_found());
        assert_eq!(gate.visible(), 1);
    }

    #[test]
    fn panics_in_the_method_unwind_unchanged() {
        let mut fuse = Fuse { blown: false };

        let payload = panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = invoke_method(&mut fuse, "blow", args![]);
        }))
        .unwrap_err();

        assert_eq!(payload.downcast_ref::<&str>(), Some(&"fuse blown"));
        assert!(fuse.blown);
    }

    #[test]
    fn shared_invocation_runs_only_ref_methods() {
        let counter = Counter { _count: 4 };

        let out = invoke_method_ref(&counter, "peek", args![]).unwrap();
        assert_eq!(out.downcast_ref::<i32>(), Some(&4));

        let err = counter.invoke_private_ref("increment", args![]).unwrap_err();
        assert!(matches!(err, AccessError::MutableReceiver { .. }));
        assert_eq!(counter._count, 4);

        let found = crate::access::resolve(Counter::type_info(), "peek", MemberKind::Method).unwrap();
        match found.member() {
            Member::Method(method) => assert_eq!(method.receiver(), Receiver::Ref),
            Member::Field(_) => panic!("`peek` resolved to a field"),
        }

        // Inherited `&self` methods project through the base link.
        let middle = Middle {
            base: Base {
                x: 5,
                label: String::new(),
            },
            x: 0,
        };
        let out = invoke_method_ref(&middle, "scaled", args![3_u8]).unwrap();
        assert_eq!(out.downcast_ref::<u8>(), Some(&15));
    }

    #[test]
    fn generic_types_get_one_descriptor_per_instantiation() {
        let mut number = Wrap {
            inner: Holder { value: 1_u32 },
            tag: 7,
        };
        let mut text = Wrap {
            inner: Holder {
                value: String::from("a"),
            },
            tag: 8,
        };

        assert!(core::ptr::eq(Wrap::<u32>::type_info(), Wrap::<u32>::type_info()));
        assert!(!core::ptr::eq(Wrap::<u32>::type_info(), Wrap::<String>::type_info()));
        assert!(Wrap::<String>::type_info().ty().is::<Wrap<String>>());

        set_field(&mut number, "value", 2_u32).unwrap();
        assert_eq!(number.inner.value, 2);

        let err = set_field(&mut text, "value", 2_u32).unwrap_err();
        assert!(matches!(err, AccessError::InvalidAssignment { .. }));

        let old = invoke_method(&mut text, "replace", args![String::from("b")]).unwrap();
        assert_eq!(old.downcast::<String>().ok().as_deref(), Some("a"));
        assert_eq!(get_field_as::<String, _>(&text, "value").unwrap(), "b");

        let tag = invoke_method_ref(&number, "tag", args![]).unwrap();
        assert_eq!(tag.downcast_ref::<u8>(), Some(&7));
        let tag = get_field(&text, "tag").unwrap();
        assert_eq!(tag.downcast_ref::<u8>(), Some(&8));

        let value: &dyn Any = get_field(&number, "value").unwrap();
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn mismatched_arguments_do_not_run_the_method() {
        let mut gate = Gate { opened: 0 };

        for args in [args![], args![1_u8], args![true, true]] {
            let err = invoke_method(&mut gate, "open", args).unwrap_err();
            match err {
                AccessError::ArgumentMismatch { expected, .. } => assert_eq!(expected, "(bool)"),
                other => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(gate.opened, 0);
    }

    #[test]
    fn duplicate_methods_are_ambiguous() {
        struct Twice {
            hits: u8,
        }

        impl Typed for Twice {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    let hit = || {
                        MethodInfo::new::<Twice>("hit", Visibility::Private, |this, _args| {
                            this.hits += 1;
                            Ok(Returned::Unit)
                        })
                    };
                    TypeInfo::builder::<Self>()
                        .field::<u8>("hits", Visibility::Private, |t| &t.hits, |t| &mut t.hits)
                        .method(hit())
                        .method(hit())
                        .build()
                })
            }
        }

        let mut twice = Twice { hits: 0 };
        let err = twice.invoke_private("hit", args![]).unwrap_err();

        assert!(matches!(err, AccessError::AmbiguousMethod { count: 2, .. }));
        assert_eq!(twice.hits, 0);
    }
}
