use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

use crate::derive_data::{InspectStruct, StructField};

/// Generate implementation code for `Typed`.
///
/// The descriptor is built with `TypeInfo::builder`, one `.field` call per
/// active field, `.base` for the `#[inspect(base)]` field and `.methods`
/// when `#[inspect(methods)]` is present.
pub(crate) fn impl_trait_typed(info: &InspectStruct) -> TokenStream {
    let sg_reflect_path = info.sg_reflect_path();
    let typed_ = crate::path::typed_(sg_reflect_path);
    let type_info_ = crate::path::type_info_(sg_reflect_path);

    let fields = info
        .active_fields()
        .map(|field| field_tokens(sg_reflect_path, field));

    let base = info.base_field().map(|field| {
        let StructField { ident, ty, .. } = field;
        let name = ident.unraw().to_string();
        quote! {
            .base::<#ty>(#name, |this| &this.#ident, |this| &mut this.#ident)
        }
    });

    let methods = info.attrs().methods.map(|_| {
        let declared = crate::path::declared_methods_fn();
        quote! {
            .methods(Self::#declared())
        }
    });

    let type_info_tokens = quote! {
        #type_info_::builder::<Self>()
            #(#fields)*
            #base
            #methods
            .build()
    };

    let inner_cell_tokens = if info.is_generic() {
        let info_cell = crate::path::generic_type_info_cell_(sg_reflect_path);
        quote! {
            static CELL: #info_cell = #info_cell::new();
            CELL.get_or_insert::<Self>(|| {
                #type_info_tokens
            })
        }
    } else {
        let info_cell = crate::path::non_generic_type_info_cell_(sg_reflect_path);
        quote! {
            static CELL: #info_cell = #info_cell::new();
            CELL.get_or_init(|| {
                #type_info_tokens
            })
        }
    };

    let real_ident = info.ident();
    let generics = info.typed_generics();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #typed_ for #real_ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #inner_cell_tokens
            }
        }
    }
}

fn field_tokens(sg_reflect_path: &syn::Path, field: &StructField) -> TokenStream {
    let StructField { ident, ty, vis, .. } = field;
    let name = ident.unraw().to_string();
    let visibility = crate::path::visibility_tokens(sg_reflect_path, vis);

    quote! {
        .field::<#ty>(#name, #visibility, |this| &this.#ident, |this| &mut this.#ident)
    }
}
