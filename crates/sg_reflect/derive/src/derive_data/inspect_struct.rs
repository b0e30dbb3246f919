use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Type, Visibility};

use crate::derive_data::{FieldAttributes, TypeAttributes};

/// One named field of the derived struct.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub vis: &'a Visibility,
    pub attrs: FieldAttributes,
}

/// A struct accepted by `#[derive(Inspect)]`.
pub(crate) struct InspectStruct<'a> {
    sg_reflect_path: syn::Path,
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
    fields: Vec<StructField<'a>>,
    base: Option<usize>,
}

impl<'a> InspectStruct<'a> {
    pub(crate) fn from_ast(ast: &'a DeriveInput) -> syn::Result<Self> {
        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => Some(named),
                Fields::Unit => None,
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Inspect` needs named fields, tuple structs are not supported",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "`Inspect` can only be derived for structs",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "`Inspect` can only be derived for structs",
                ));
            }
        };

        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "`Inspect` types must be `'static`, lifetime parameters are not supported",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut fields = Vec::new();
        let mut base = None;
        for field in named.into_iter().flat_map(|named| named.named.iter()) {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            // `Fields::Named` always carries identifiers.
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };

            if let Some(span) = field_attrs.base {
                if base.is_some() {
                    return Err(syn::Error::new(span, "only one field can be the `base`"));
                }
                base = Some(fields.len());
            }

            fields.push(StructField {
                ident,
                ty: &field.ty,
                vis: &field.vis,
                attrs: field_attrs,
            });
        }

        Ok(Self {
            sg_reflect_path: crate::path::sg_reflect(),
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            fields,
            base,
        })
    }

    #[inline]
    pub(crate) fn sg_reflect_path(&self) -> &syn::Path {
        &self.sg_reflect_path
    }

    #[inline]
    pub(crate) fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub(crate) fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    /// Fields that take part in the descriptor, in declaration order.
    pub(crate) fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| field.attrs.skip.is_none())
    }

    pub(crate) fn base_field(&self) -> Option<&StructField<'a>> {
        self.base.map(|index| &self.fields[index])
    }

    /// `true` when the descriptor has to live in a `GenericTypeInfoCell`.
    pub(crate) fn is_generic(&self) -> bool {
        self.generics
            .params
            .iter()
            .any(|param| !matches!(param, GenericParam::Lifetime(_)))
    }

    /// Generics for the `Typed` impl; every type parameter gets `'static`
    /// and the base type must itself be `Typed`.
    pub(crate) fn typed_generics(&self) -> Generics {
        let mut generics = self.generics.clone();
        let typed_ = crate::path::typed_(&self.sg_reflect_path);

        if self.is_generic() {
            let where_clause = generics.make_where_clause();
            for param in self.generics.type_params() {
                let ident = &param.ident;
                where_clause.predicates.push(syn::parse_quote!(#ident: 'static));
            }
            if let Some(base) = self.base_field() {
                let ty = base.ty;
                where_clause.predicates.push(syn::parse_quote!(#ty: #typed_));
            }
        }

        generics
    }
}
