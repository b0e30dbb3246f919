//! Paths to `sg_reflect` items used by generated code.
//!
//! Kept in one place so that moving an item in `sg_reflect` only touches
//! this module.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `sg_reflect` crate.
///
/// 1. For crates that depend on `sg_reflect`, `::sg_reflect` is returned.
/// 2. For crates that depend on `spyglass`, `::spyglass::reflect` is returned.
/// 3. For other situations, `::sg_reflect` is returned, but this may be incorrect.
///
/// Reading the manifest is relatively expensive, so the path is obtained
/// once per macro call and passed around.
pub(crate) fn sg_reflect() -> syn::Path {
    sg_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("sg_reflect"))
}

#[inline(always)]
pub(crate) fn typed_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::info::Typed }
}

#[inline(always)]
pub(crate) fn type_info_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::info::TypeInfo }
}

#[inline(always)]
pub(crate) fn type_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::info::Type }
}

#[inline(always)]
pub(crate) fn visibility_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::info::Visibility }
}

#[inline(always)]
pub(crate) fn method_info_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::info::MethodInfo }
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::info::NonGenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::info::GenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn returned_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::access::Returned }
}

#[inline(always)]
pub(crate) fn invoke_error_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::access::InvokeError }
}

#[inline(always)]
pub(crate) fn vec_(sg_reflect_path: &syn::Path) -> TokenStream {
    quote! { #sg_reflect_path::__macro_exports::Vec }
}

/// Name of the hidden associated function emitted by `#[inspect_methods]`.
#[inline(always)]
pub(crate) fn declared_methods_fn() -> syn::Ident {
    syn::Ident::new("__sg_declared_methods", proc_macro2::Span::call_site())
}

/// Maps a Rust visibility onto `sg_reflect::info::Visibility`.
pub(crate) fn visibility_tokens(sg_reflect_path: &syn::Path, vis: &syn::Visibility) -> TokenStream {
    let visibility_ = visibility_(sg_reflect_path);
    match vis {
        syn::Visibility::Public(_) => quote! { #visibility_::Public },
        syn::Visibility::Restricted(_) => quote! { #visibility_::Restricted },
        syn::Visibility::Inherited => quote! { #visibility_::Private },
    }
}
