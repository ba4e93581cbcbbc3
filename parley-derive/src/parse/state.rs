/*!
The hidden state struct for a `derive(Parse)` type. Every field is stored as
an `Option`, which stays `None` until the field's first value arrives, and
each field gets a `__store_{field}` method that decodes one argument into
it. The model table points at those methods.
*/

use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Ident, Type, Visibility};

use crate::common::{FieldBase, IdentString, ParsedFieldInfo, known_types::Wrapper};

pub fn store_fn_ident(ident: &IdentString<'_>) -> Ident {
    format_ident!("__store_{}", ident.as_str())
}

/// The type held inside the field's `Option` in the state struct
fn stored_type<'a>(base: &FieldBase<'a>) -> &'a Type {
    match base.shape.wrapper {
        Some(Wrapper::Nullable) => base.shape.scalar,
        Some(Wrapper::Sequence) | None => base.ty,
    }
}

fn store_fn(base: &FieldBase<'_>) -> TokenStream2 {
    let ident = &base.ident;
    let store = store_fn_ident(ident);
    let scalar = base.shape.scalar;

    let assign = match base.shape.wrapper {
        Some(Wrapper::Sequence) => quote! {
            ::core::iter::Extend::extend(
                self.#ident.get_or_insert_with(::core::default::Default::default),
                ::core::iter::once(value),
            );
        },
        Some(Wrapper::Nullable) | None => quote! {
            self.#ident = ::core::option::Option::Some(value);
        },
    };

    quote! {
        fn #store(
            &mut self,
            argument: &str,
        ) -> ::core::result::Result<(), ::parley::ValueError> {
            match <#scalar as ::parley::Value>::from_arg(argument) {
                ::core::result::Result::Ok(value) => {
                    #assign
                    ::core::result::Result::Ok(())
                }
                ::core::result::Result::Err(err) => ::core::result::Result::Err(err),
            }
        }
    }
}

pub fn state_definition(
    vis: &Visibility,
    state_ident: &Ident,
    fields: &[ParsedFieldInfo<'_>],
) -> TokenStream2 {
    let field_definitions = fields.iter().map(|field| {
        let base = field.base();
        let ident = &base.ident;
        let stored = stored_type(base);

        quote! { #ident: ::core::option::Option<#stored> }
    });

    let store_fns = fields.iter().map(|field| store_fn(field.base()));

    quote! {
        #[doc(hidden)]
        #[derive(::core::default::Default)]
        #vis struct #state_ident {
            #(#field_definitions,)*
        }

        impl #state_ident {
            #(#store_fns)*
        }
    }
}
