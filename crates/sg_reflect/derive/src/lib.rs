//! See following macros:
//!
//! - [`Inspect`](derive_inspect)
//! - [`inspect_methods`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemImpl, parse_macro_input};

static INSPECT_ATTRIBUTE_NAME: &str = "inspect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Derive Type Descriptors
///
/// `#[derive(Inspect)]` implements `Typed` (and therefore `Inspect`) for a
/// struct with named fields, or a unit struct.
///
/// Every field is recorded with its declared visibility. Only non-public
/// fields can be reached by `sg_reflect::access`, but public ones are
/// recorded too.
///
/// ```rust, ignore
/// #[derive(Inspect)]
/// struct Account {
///     balance: i64,
///     pub owner: String,
/// }
/// ```
///
/// ## Base Types
///
/// Rust has no inheritance. A struct that "extends" another embeds it and
/// marks the field with `#[inspect(base)]`; the embedded type must be
/// `Typed` itself. Lookups then continue into the base after the struct's
/// own members.
///
/// ```rust, ignore
/// #[derive(Inspect)]
/// struct Savings {
///     #[inspect(base)]
///     account: Account,
///     rate: f32,
/// }
/// ```
///
/// At most one field can be the base.
///
/// ## Skipping Fields
///
/// `#[inspect(skip)]` leaves a field out of the descriptor, as if it did not
/// exist. A base field cannot be skipped.
///
/// ## Methods
///
/// `#[inspect(methods)]` at the type level pulls in the method table built
/// by [`inspect_methods`], which must then be applied to exactly one
/// inherent impl block of the type.
///
/// ## Limitations
///
/// - Enums, unions and tuple structs are rejected.
/// - Lifetime parameters are rejected; type parameters receive a `'static`
///   bound.
/// - With `#[inspect(methods)]` on a generic struct, the `#[inspect_methods]`
///   impl block must not bound its parameters beyond the struct's own bounds
///   and `'static`. `impl<T: 'static> Wrap<T>` works, `impl<T: Clone> Wrap<T>`
///   does not: the method table is only reachable where `T: Clone` holds, and
///   rustc reports a missing `__sg_declared_methods` (E0599) at the derive.
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::InspectStruct::from_ast(&ast) {
        Ok(info) => impls::impl_trait_typed(&info).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Describe Methods
///
/// Applied to an inherent impl block, records its methods in a hidden table
/// that `#[derive(Inspect)]` picks up with `#[inspect(methods)]`.
///
/// ```rust, ignore
/// #[derive(Inspect)]
/// #[inspect(methods)]
/// struct Counter {
///     count: u32,
/// }
///
/// #[inspect_methods]
/// impl Counter {
///     fn increment(&mut self) {
///         self.count += 1;
///     }
///
///     #[inspect(skip)]
///     fn reset(&mut self) {
///         self.count = 0;
///     }
/// }
/// ```
///
/// A method is recorded when:
///
/// - its receiver is `&self` or `&mut self`,
/// - it is neither `async` nor `unsafe` and has no generic parameters,
/// - its parameter and return types are owned `'static` types.
///
/// Other methods are left out silently. `#[inspect(skip)]` leaves out a
/// method explicitly.
///
/// A method returning `Result<T, E>` is recorded as returning `T`; its `Err`
/// is reported as an invocation error, so `E` has to convert into
/// `Box<dyn Error + Send + Sync>`.
///
/// On a generic type the impl block may bound its parameters with `'static`
/// and the bounds the struct already declares, nothing more. See the
/// limitations of [`Inspect`](derive_inspect).
#[proc_macro_attribute]
pub fn inspect_methods(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return syn::Error::new_spanned(attr, "`inspect_methods` takes no arguments")
            .into_compile_error()
            .into();
    }

    let item = parse_macro_input!(item as ItemImpl);

    match impls::impl_declared_methods(item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
