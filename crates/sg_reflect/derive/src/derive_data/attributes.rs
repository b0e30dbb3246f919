//! Parsing of `#[inspect(..)]` attributes.

use proc_macro2::Span;
use syn::Attribute;
use syn::spanned::Spanned;

use crate::INSPECT_ATTRIBUTE_NAME;

/// Type level flags, `#[inspect(methods)]`.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    /// Include the table emitted by `#[inspect_methods]`.
    pub methods: Option<Span>,
}

impl TypeAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident(INSPECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("methods") {
                    if this.methods.is_some() {
                        return Err(meta.error("duplicate `methods` flag"));
                    }
                    this.methods = Some(meta.path.span());
                    Ok(())
                } else {
                    Err(meta.error("unsupported type attribute, expected `methods`"))
                }
            })?;
        }

        Ok(this)
    }
}

/// Field level flags, `#[inspect(base)]` and `#[inspect(skip)]`.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    /// The field embeds the base type.
    pub base: Option<Span>,
    /// The field is left out of the descriptor.
    pub skip: Option<Span>,
}

impl FieldAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident(INSPECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("base") {
                    &mut this.base
                } else if meta.path.is_ident("skip") {
                    &mut this.skip
                } else {
                    return Err(meta.error("unsupported field attribute, expected `base` or `skip`"));
                };
                if slot.is_some() {
                    return Err(meta.error("duplicate field flag"));
                }
                *slot = Some(meta.path.span());
                Ok(())
            })?;
        }

        if let (Some(_), Some(skip)) = (this.base, this.skip) {
            return Err(syn::Error::new(skip, "a `base` field cannot be skipped"));
        }

        Ok(this)
    }
}

/// Method level flag, `#[inspect(skip)]`.
///
/// Returns `true` if the method is skipped; the attributes are consumed so
/// that the re-emitted impl block compiles.
pub(crate) fn take_method_skip(attrs: &mut Vec<Attribute>) -> syn::Result<bool> {
    let mut skip = false;
    let mut error: Option<syn::Error> = None;

    attrs.retain(|attr| {
        if !attr.path().is_ident(INSPECT_ATTRIBUTE_NAME) {
            return true;
        }
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported method attribute, expected `skip`"))
            }
        });
        if let Err(err) = parsed {
            match &mut error {
                Some(first) => first.combine(err),
                None => error = Some(err),
            }
        }
        false
    });

    match error {
        Some(err) => Err(err),
        None => Ok(skip),
    }
}
