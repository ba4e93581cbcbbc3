mod build;
mod state;
mod table;

use itertools::Itertools as _;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, Ident, Token, Visibility, punctuated::Punctuated, spanned::Spanned as _};

use crate::{
    common::{
        ParsedFieldInfo,
        known_types::KnownTypes,
        model::{check_tag_collisions, find_remaining, resolve_parameters},
        program::ProgramAttr,
    },
    generics::reject_generics,
};

pub fn derive_parse_result(item: TokenStream2) -> syn::Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(item)?;
    reject_generics(&input.generics, "Parse")?;

    let fields = match input.data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => &fields.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new(
                    input.span(),
                    "can only derive `Parse` on structs with named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new(
                input.span(),
                "can't derive `Parse` on an enum; use `derive(Value)` for enum values",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "can't derive `Parse` on a union",
            ));
        }
    };

    let program = ProgramAttr::from_attributes(&input.attrs)?;

    derive_parse_struct(&input.ident, &input.vis, fields, &program)
}

fn derive_parse_struct(
    name: &Ident,
    vis: &Visibility,
    fields: &Punctuated<Field, Token![,]>,
    program: &ProgramAttr,
) -> syn::Result<TokenStream2> {
    let known_types = KnownTypes::new();

    let fields: Vec<ParsedFieldInfo<'_>> = fields
        .iter()
        .map(|field| ParsedFieldInfo::from_field(field, &known_types))
        .try_collect()?;

    check_tag_collisions(&fields)?;
    let parameters = resolve_parameters(&fields)?;
    let remaining = find_remaining(&fields)?;

    let state_ident = format_ident!("__{}State", name);

    // Hygienic, so that it can't collide with a field name
    let state_var = Ident::new("state", Span::mixed_site());

    let state_definition = state::state_definition(vis, &state_ident, &fields);
    let model = table::model_const(&state_ident, program, &fields, &parameters, remaining);
    let build_body = build::build_body(&state_var, &fields, &parameters, remaining);

    Ok(quote! {
        #state_definition

        impl ::parley::Parse for #name {
            type State = #state_ident;

            const MODEL: ::parley::model::Model<#state_ident> = #model;

            fn build(
                #state_var: #state_ident,
            ) -> ::core::result::Result<Self, ::parley::ParseError> {
                #build_body
            }
        }
    })
}
