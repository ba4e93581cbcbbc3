use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::Ident;

use super::table::option_tags;
use crate::common::{
    FieldBase, FieldDefault, ParsedFieldInfo, RemainingFieldInfo, known_types::Wrapper,
    model::IndexedParameter,
};

/// Produce the `let` binding that pulls one field out of the state, applying
/// its default or reporting it as missing.
fn field_binding(
    state: &Ident,
    base: &FieldBase<'_>,
    missing: Option<TokenStream2>,
) -> TokenStream2 {
    let ident = &base.ident;

    let present = match base.shape.wrapper {
        Some(Wrapper::Nullable) => quote! { ::core::option::Option::Some(value) },
        Some(Wrapper::Sequence) | None => quote! { value },
    };

    let absent = match (&base.default, missing) {
        (FieldDefault::Expr(expr), _) => quote! { #expr },
        (FieldDefault::Trait, _) => quote! { ::core::default::Default::default() },
        (FieldDefault::None, Some(missing)) if base.required => quote! {
            return ::core::result::Result::Err(#missing)
        },
        (FieldDefault::None, _) => match base.shape.wrapper {
            Some(Wrapper::Nullable) => quote! { ::core::option::Option::None },

            // Flags and sequences: `false` or empty
            Some(Wrapper::Sequence) | None => quote! { ::core::default::Default::default() },
        },
    };

    quote! {
        let #ident = match #state.#ident {
            ::core::option::Option::Some(value) => #present,
            ::core::option::Option::None => #absent,
        };
    }
}

pub fn build_body(
    state: &Ident,
    fields: &[ParsedFieldInfo<'_>],
    parameters: &[IndexedParameter<'_, '_>],
    remaining: Option<&RemainingFieldInfo<'_>>,
) -> TokenStream2 {
    let options = fields
        .iter()
        .filter_map(|field| field.as_option())
        .map(|option| {
            let tags = option_tags(&option.tags);

            field_binding(
                state,
                &option.base,
                Some(quote! { ::parley::ParseError::MissingRequiredOption { tags: #tags } }),
            )
        });

    let parameters = parameters.iter().map(|parameter| {
        let name = parameter.info.name.as_str();
        let index = parameter.index;

        field_binding(
            state,
            &parameter.info.base,
            Some(quote! {
                ::parley::ParseError::MissingRequiredParameter {
                    parameter: #name,
                    index: #index,
                }
            }),
        )
    });

    // `remaining` is never required, so it can't be missing
    let remaining = remaining.map(|remaining| field_binding(state, &remaining.base, None));

    let idents = fields.iter().map(|field| &field.base().ident);

    quote! {
        #(#options)*
        #(#parameters)*
        #remaining

        ::core::result::Result::Ok(Self {
            #(#idents,)*
        })
    }
}
