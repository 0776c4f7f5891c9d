//! `#[derive(Bindable)]` expansion.

use crate::parse::{field_name, ContainerAttrs, FieldAttrs};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_quote, spanned::Spanned, Data, DeriveInput, Fields, GenericParam};

/// Expands the derive for one struct.
pub fn expand_bindable(input: TokenStream) -> syn::Result<TokenStream> {
    let mut input: DeriveInput = syn::parse2(input)?;
    let container = ContainerAttrs::from_attrs(&input.attrs)?;
    let krate = container
        .krate
        .clone()
        .unwrap_or_else(|| parse_quote!(::hermes_bind));

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => {
                let mut bindings = Vec::new();
                let mut calls = Vec::new();

                for field in &named.named {
                    let attrs = FieldAttrs::from_field(field)?;
                    if attrs.skip {
                        continue;
                    }
                    let Some(ident) = field.ident.as_ref() else {
                        continue;
                    };

                    let call = if attrs.flatten {
                        quote! { #krate::Bindable::describe(#ident, path, table); }
                    } else {
                        let name = field_name(ident, &attrs, &container);
                        quote! { #krate::Bindable::describe(#ident, &path.child(#name), table); }
                    };
                    bindings.push(ident.clone());
                    calls.push(call);
                }

                quote! {
                    let Self { #(#bindings,)* .. } = self;
                    #(#calls)*
                }
            }
            Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                let inner = format_ident!("inner");
                quote! {
                    let Self(#inner) = self;
                    #krate::Bindable::describe(#inner, path, table);
                }
            }
            Fields::Unnamed(unnamed) => {
                return Err(syn::Error::new(
                    unnamed.span(),
                    "Bindable can only be derived for tuple structs with exactly one field",
                ))
            }
            Fields::Unit => quote! {},
        },
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "Bindable cannot be derived for enums",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "Bindable cannot be derived for unions",
            ))
        }
    };

    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(#krate::Bindable));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Bindable for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn describe<'__bind>(
                &'__bind mut self,
                path: &#krate::FieldPath,
                table: &mut #krate::FieldTable<'__bind>,
            ) {
                #body
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> String {
        expand_bindable(input).unwrap().to_string()
    }

    #[test]
    fn test_named_struct() {
        let out = expand(quote! {
            #[serde(default)]
            struct Request {
                #[serde(rename = "id")]
                id: String,
                #[serde(rename = "p")]
                page: Page,
                #[serde(skip)]
                cache: u32,
            }
        });

        assert!(out.contains("let Self { id , page , .. } = self"), "{out}");
        assert!(out.contains("path . child (\"id\")"), "{out}");
        assert!(out.contains("path . child (\"p\")"), "{out}");
        assert!(!out.contains("cache"), "{out}");
    }

    #[test]
    fn test_flatten_reuses_path() {
        let out = expand(quote! {
            struct Request {
                #[serde(flatten)]
                audit: Audit,
            }
        });
        assert!(
            out.contains(":: hermes_bind :: Bindable :: describe (audit , path , table)"),
            "{out}"
        );
    }

    #[test]
    fn test_custom_crate_path() {
        let out = expand(quote! {
            #[bind(crate = "hermes::bind")]
            struct Request { id: String }
        });
        assert!(out.contains("impl hermes :: bind :: Bindable for Request"), "{out}");
    }

    #[test]
    fn test_newtype() {
        let out = expand(quote! { struct Flip(bool); });
        assert!(out.contains("let Self (inner) = self"), "{out}");
    }

    #[test]
    fn test_generic_params_get_bound() {
        let out = expand(quote! { struct Wrapper<T> { value: T } });
        assert!(out.contains("T : :: hermes_bind :: Bindable"), "{out}");
    }

    #[test]
    fn test_rejects_enums_and_wide_tuples() {
        assert!(expand_bindable(quote! { enum Kind { A, B } }).is_err());
        assert!(expand_bindable(quote! { struct Pair(u8, u8); }).is_err());
    }

    #[test]
    fn test_unit_struct() {
        assert!(expand_bindable(quote! { struct Ping; }).is_ok());
    }
}
