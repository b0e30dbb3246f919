use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, PathArguments, ReturnType, Type};

use crate::derive_data::take_method_skip;

// -----------------------------------------------------------------------------
// Eligibility

/// Rejects types that borrow or cannot be named as a `TypeId` source.
#[derive(Default)]
struct OwnedStatic {
    rejected: bool,
}

impl<'ast> Visit<'ast> for OwnedStatic {
    fn visit_type(&mut self, ty: &'ast Type) {
        match ty {
            Type::Reference(_) | Type::ImplTrait(_) | Type::Infer(_) | Type::Never(_) | Type::Macro(_) => {
                self.rejected = true;
            }
            _ => visit::visit_type(self, ty),
        }
    }

    fn visit_lifetime(&mut self, lifetime: &'ast syn::Lifetime) {
        if lifetime.ident != "static" {
            self.rejected = true;
        }
    }
}

fn is_owned_static(ty: &Type) -> bool {
    let mut visitor = OwnedStatic::default();
    visitor.visit_type(ty);
    !visitor.rejected
}

/// `Some(T)` if `ty` is spelled `Result<T, ..>`.
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(ok) => Some(ok),
        _ => None,
    }
}

enum Output<'a> {
    Plain(&'a Type),
    Unit,
    Fallible(&'a Type),
}

/// A method that can be described, with its receiver mutability and the types
/// of its parameters.
struct Eligible<'a> {
    func: &'a ImplItemFn,
    mutable: bool,
    params: Vec<&'a Type>,
    output: Output<'a>,
}

fn eligible(func: &ImplItemFn) -> Option<Eligible<'_>> {
    let sig = &func.sig;
    if sig.asyncness.is_some()
        || sig.unsafety.is_some()
        || sig.variadic.is_some()
        || !sig.generics.params.is_empty()
    {
        return None;
    }

    let receiver = sig.receiver()?;
    if receiver.reference.is_none() || receiver.colon_token.is_some() {
        return None;
    }
    if let Some((_, Some(lifetime))) = &receiver.reference
        && lifetime.ident == "static"
    {
        return None;
    }

    let mut params = Vec::new();
    for input in sig.inputs.iter().skip(1) {
        let FnArg::Typed(pat) = input else {
            return None;
        };
        if !is_owned_static(&pat.ty) {
            return None;
        }
        params.push(&*pat.ty);
    }

    let output = match &sig.output {
        ReturnType::Default => Output::Unit,
        ReturnType::Type(_, ty) => match result_ok_type(ty) {
            Some(ok) if is_owned_static(ok) => Output::Fallible(ok),
            Some(_) => return None,
            None if is_owned_static(ty) => Output::Plain(ty),
            None => return None,
        },
    };

    Some(Eligible {
        func,
        mutable: receiver.mutability.is_some(),
        params,
        output,
    })
}

// -----------------------------------------------------------------------------
// Code generation

fn method_tokens(sg_reflect_path: &syn::Path, method: &Eligible) -> TokenStream {
    let method_info_ = crate::path::method_info_(sg_reflect_path);
    let type_ = crate::path::type_(sg_reflect_path);
    let returned_ = crate::path::returned_(sg_reflect_path);
    let invoke_error_ = crate::path::invoke_error_(sg_reflect_path);

    let ident = &method.func.sig.ident;
    let name = ident.unraw().to_string();
    let visibility = crate::path::visibility_tokens(sg_reflect_path, &method.func.vis);
    let constructor = if method.mutable {
        format_ident!("new")
    } else {
        format_ident!("new_ref")
    };

    let params = &method.params;
    let locals: Vec<_> = (0..params.len()).map(|i| format_ident!("__arg{i}")).collect();
    let cursor = format_ident!("args");
    let cursor_pat = if params.is_empty() {
        quote! { _args }
    } else {
        quote! { mut #cursor }
    };

    let call = quote! { Self::#ident(this, #(#locals),*) };
    let (body, ret) = match &method.output {
        Output::Unit => (
            quote! {
                #call;
                ::core::result::Result::Ok(#returned_::Unit)
            },
            quote! { () },
        ),
        Output::Plain(ty) => (
            quote! { ::core::result::Result::Ok(#returned_::from_value(#call)) },
            quote! { #ty },
        ),
        Output::Fallible(ty) => (
            quote! {
                match #call {
                    ::core::result::Result::Ok(value) => {
                        ::core::result::Result::Ok(#returned_::from_value(value))
                    }
                    ::core::result::Result::Err(err) => {
                        ::core::result::Result::Err(#invoke_error_::raised(err))
                    }
                }
            },
            quote! { #ty },
        ),
    };

    let with_params = (!params.is_empty()).then(|| {
        quote! { .with_params([#(#type_::of::<#params>()),*]) }
    });

    quote! {
        #method_info_::#constructor::<Self>(#name, #visibility, |this, #cursor_pat| {
            #(let #locals = #cursor.take::<#params>()?;)*
            #body
        })
        #with_params
        .with_return(#type_::of::<#ret>())
    }
}

/// Expands `#[inspect_methods]`.
///
/// Re-emits the impl block without `#[inspect(..)]` attributes and appends a
/// second impl block holding the hidden method table.
pub(crate) fn impl_declared_methods(mut item: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(
            path.span(),
            "`inspect_methods` only applies to inherent impl blocks",
        ));
    }

    let mut skipped = Vec::new();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(func) = impl_item {
            skipped.push(take_method_skip(&mut func.attrs)?);
        }
    }

    let sg_reflect_path = crate::path::sg_reflect();
    let vec_ = crate::path::vec_(&sg_reflect_path);
    let method_info_ = crate::path::method_info_(&sg_reflect_path);
    let declared = crate::path::declared_methods_fn();

    let functions = item.items.iter().filter_map(|impl_item| match impl_item {
        ImplItem::Fn(func) => Some(func),
        _ => None,
    });

    let mut entries = Vec::new();
    for (func, skip) in functions.zip(skipped) {
        if skip {
            continue;
        }
        let Some(method) = eligible(func) else {
            continue;
        };
        let cfgs = func.attrs.iter().filter(|attr| attr.path().is_ident("cfg"));
        let tokens = method_tokens(&sg_reflect_path, &method);
        entries.push(quote! {
            #(#cfgs)*
            methods.push(#tokens);
        });
    }

    let (impl_generics, _, where_clause) = item.generics.split_for_impl();
    let self_ty = &item.self_ty;

    Ok(quote! {
        #item

        impl #impl_generics #self_ty #where_clause {
            #[doc(hidden)]
            #[allow(unused_mut)]
            pub(crate) fn #declared() -> #vec_<#method_info_>
            where
                Self: ::core::any::Any,
            {
                let mut methods = #vec_::new();
                #(#entries)*
                methods
            }
        }
    })
}
