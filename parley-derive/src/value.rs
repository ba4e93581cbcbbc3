use itertools::Itertools as _;
use proc_macro2::{Literal, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Ident, Token, Type, Variant, punctuated::Punctuated, spanned::Spanned};

use crate::{common::value::AnalyzedEnum, generics::reject_generics};

fn derive_value_enum(
    ident: &Ident,
    variants: &Punctuated<Variant, Token![,]>,
) -> syn::Result<TokenStream2> {
    if variants.is_empty() {
        return Err(syn::Error::new(
            ident.span(),
            "can't derive `Value` on an enum with no variants",
        ));
    }

    let analyzed = AnalyzedEnum::from_variants(variants)?;

    let arms = analyzed.variants.iter().map(|(name, variant)| {
        let scrutinee = Literal::string(name);
        quote! {
            #scrutinee => ::core::result::Result::Ok(Self::#variant),
        }
    });

    let names = analyzed.variants.iter().map(|(name, _)| name.as_str());
    let names = quote! { &[ #(#names,)* ] };

    Ok(quote! {
        impl ::parley::Value for #ident {
            const KIND: ::parley::model::ScalarKind =
                ::parley::model::ScalarKind::Enum { names: #names };

            fn from_arg(
                argument: &str,
            ) -> ::core::result::Result<Self, ::parley::ValueError> {
                match argument {
                    #(#arms)*
                    _ => ::core::result::Result::Err(
                        ::parley::ValueError::should_be(argument, #names)
                    ),
                }
            }
        }
    })
}

fn derive_value_newtype(ident: &Ident, field: Option<&Ident>, ty: &Type) -> TokenStream2 {
    let struct_body = match field {
        Some(field) => quote! { { #field: value } },
        None => quote! { ( value ) },
    };

    quote! {
        impl ::parley::Value for #ident {
            const KIND: ::parley::model::ScalarKind = <#ty as ::parley::Value>::KIND;

            fn from_arg(
                argument: &str,
            ) -> ::core::result::Result<Self, ::parley::ValueError> {
                match <#ty as ::parley::Value>::from_arg(argument) {
                    ::core::result::Result::Ok(value) => ::core::result::Result::Ok(
                        Self #struct_body
                    ),
                    ::core::result::Result::Err(err) => ::core::result::Result::Err(err),
                }
            }
        }
    }
}

pub fn derive_value_result(item: TokenStream2) -> syn::Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(item)?;
    reject_generics(&input.generics, "Value")?;

    match input.data {
        Data::Struct(ref data) => {
            let field = data.fields.iter().exactly_one().map_err(|_| {
                syn::Error::new(
                    input.span(),
                    "can only derive `Value` on structs with exactly one field",
                )
            })?;

            Ok(derive_value_newtype(
                &input.ident,
                field.ident.as_ref(),
                &field.ty,
            ))
        }
        Data::Enum(ref data) => derive_value_enum(&input.ident, &data.variants),
        Data::Union(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `Value` on a union",
        )),
    }
}
