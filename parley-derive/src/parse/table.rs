use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::Ident;

use super::state::store_fn_ident;
use crate::common::{
    OptionFieldInfo, OptionTag, ParsedFieldInfo, RemainingFieldInfo,
    known_types::{TypeShape, Wrapper},
    model::IndexedParameter,
    program::ProgramAttr,
};

pub fn option_tags(tags: &OptionTag) -> TokenStream2 {
    match *tags {
        OptionTag::Long(ref long) => {
            let long = long.as_str();
            quote! { ::parley::Tags::Long { long: #long } }
        }
        OptionTag::Short(ref short) => {
            let short = **short;
            quote! { ::parley::Tags::Short { short: #short } }
        }
        OptionTag::LongShort {
            ref long,
            ref short,
        } => {
            let long = long.as_str();
            let short = **short;
            quote! { ::parley::Tags::LongShort { long: #long, short: #short } }
        }
    }
}

fn value_kind(shape: &TypeShape<'_>) -> TokenStream2 {
    let scalar = shape.scalar;
    let kind = quote! { <#scalar as ::parley::Value>::KIND };

    match shape.wrapper {
        None => quote! { ::parley::model::ValueKind::Scalar(#kind) },
        Some(Wrapper::Nullable) => quote! { ::parley::model::ValueKind::Nullable(#kind) },
        Some(Wrapper::Sequence) => quote! { ::parley::model::ValueKind::Sequence(#kind) },
    }
}

fn option_spec(state_ident: &Ident, option: &OptionFieldInfo<'_>) -> TokenStream2 {
    let base = &option.base;
    let field = base.ident.as_str();
    let tags = option_tags(&option.tags);
    let kind = value_kind(&base.shape);
    let required = base.required;
    let description = base.docs.as_str();
    let store = store_fn_ident(&base.ident);

    quote! {
        ::parley::model::OptionSpec {
            field: #field,
            tags: #tags,
            kind: #kind,
            required: #required,
            description: #description,
            store: #state_ident::#store,
        }
    }
}

fn parameter_spec(state_ident: &Ident, parameter: &IndexedParameter<'_, '_>) -> TokenStream2 {
    let base = &parameter.info.base;
    let index = parameter.index;
    let name = parameter.info.name.as_str();
    let kind = value_kind(&base.shape);
    let required = base.required;
    let description = base.docs.as_str();
    let store = store_fn_ident(&base.ident);

    quote! {
        ::parley::model::ParameterSpec {
            index: #index,
            name: #name,
            kind: #kind,
            required: #required,
            description: #description,
            store: #state_ident::#store,
        }
    }
}

fn remaining_spec(state_ident: &Ident, remaining: Option<&RemainingFieldInfo<'_>>) -> TokenStream2 {
    match remaining {
        None => quote! { ::core::option::Option::None },
        Some(remaining) => {
            let base = &remaining.base;
            let name = remaining.name.as_str();
            let kind = value_kind(&base.shape);
            let description = base.docs.as_str();
            let store = store_fn_ident(&base.ident);

            quote! {
                ::core::option::Option::Some(::parley::model::RemainingSpec {
                    name: #name,
                    kind: #kind,
                    description: #description,
                    store: #state_ident::#store,
                })
            }
        }
    }
}

fn optional(value: Option<impl ToTokens>) -> TokenStream2 {
    match value {
        None => quote! { ::core::option::Option::None },
        Some(value) => quote! { ::core::option::Option::Some(#value) },
    }
}

fn program_info(program: &ProgramAttr) -> TokenStream2 {
    let name = match program.name {
        Some(ref name) => name.to_token_stream(),
        None => quote! { ::core::env!("CARGO_PKG_NAME") },
    };

    let version = match program.version {
        Some(ref version) => version.to_token_stream(),
        None => quote! { ::core::env!("CARGO_PKG_VERSION") },
    };

    let copyright = optional(program.copyright.as_ref());

    let help_text = optional(
        program
            .help_text
            .as_ref()
            .map(|path| quote! { #path as ::parley::model::HelpTextFn }),
    );

    let messages = optional(program.messages.as_ref().map(|path| quote! { &#path }));

    quote! {
        ::parley::model::ProgramInfo {
            name: #name,
            version: #version,
            copyright: #copyright,
            help_text: #help_text,
            messages: #messages,
        }
    }
}

fn command_specs(program: &ProgramAttr) -> impl Iterator<Item = TokenStream2> + '_ {
    program.commands.iter().map(|command| {
        let aliases = command.aliases.iter().map(|alias| alias.as_str());
        let description = &command.description;
        let handler = &command.handler;

        quote! {
            ::parley::model::SpecialCommandSpec {
                aliases: &[ #(#aliases,)* ],
                description: #description,
                handler: ::parley::special::instantiate::<#handler>,
            }
        }
    })
}

pub fn model_const(
    state_ident: &Ident,
    program: &ProgramAttr,
    fields: &[ParsedFieldInfo<'_>],
    parameters: &[IndexedParameter<'_, '_>],
    remaining: Option<&RemainingFieldInfo<'_>>,
) -> TokenStream2 {
    let info = program_info(program);

    let options = fields
        .iter()
        .filter_map(|field| field.as_option())
        .map(|option| option_spec(state_ident, option));

    let parameters = parameters
        .iter()
        .map(|parameter| parameter_spec(state_ident, parameter));

    let remaining = remaining_spec(state_ident, remaining);
    let commands = command_specs(program);

    quote! {
        ::parley::model::Model {
            info: #info,
            options: &[ #(#options,)* ],
            parameters: &[ #(#parameters,)* ],
            remaining: #remaining,
            commands: &[ #(#commands,)* ],
        }
    }
}
