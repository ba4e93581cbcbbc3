/*!
Attributes on the struct itself: program metadata, help overrides, and the
special commands (`--help`, `--version`, and any user-defined ones).
*/

use std::collections::HashMap;

use darling::{FromAttributes as _, util::SpannedValue};
use lazy_format::lazy_format;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{Attribute, Path, Type};

use super::detect_collision;

pub const HELP_ALIAS: &str = "--help";
pub const VERSION_ALIAS: &str = "--version";

#[derive(darling::FromMeta, Debug)]
struct RawCommand {
    handler: Type,

    #[darling(multiple, rename = "alias")]
    aliases: Vec<SpannedValue<String>>,

    #[darling(default)]
    description: String,
}

#[derive(darling::FromAttributes, Debug)]
#[darling(attributes(parley))]
struct RawParsedTypeAttr {
    name: Option<String>,
    version: Option<String>,
    copyright: Option<String>,
    no_help: Option<()>,
    no_version: Option<()>,
    help_text: Option<Path>,
    messages: Option<Path>,

    #[darling(multiple, rename = "command")]
    commands: Vec<SpannedValue<RawCommand>>,
}

pub struct CommandInfo {
    pub handler: TokenStream2,
    pub aliases: Vec<SpannedValue<String>>,

    /// An expression evaluating to the `&'static str` description
    pub description: TokenStream2,
}

pub struct ProgramAttr {
    pub name: Option<String>,
    pub version: Option<String>,
    pub copyright: Option<String>,
    pub help_text: Option<Path>,
    pub messages: Option<Path>,
    pub commands: Vec<CommandInfo>,
}

impl ProgramAttr {
    pub fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let parsed = RawParsedTypeAttr::from_attributes(attrs)?;

        let user_commands: Vec<CommandInfo> = parsed
            .commands
            .into_iter()
            .map(|command| {
                let span = command.span();
                let command = command_info(&command);

                if command.aliases.is_empty() {
                    return Err(syn::Error::new(
                        span,
                        "a special command needs at least one `alias`",
                    ));
                }

                command.aliases.iter().try_for_each(validate_alias)?;
                Ok(command)
            })
            .collect::<syn::Result<_>>()?;

        let replaced = |alias: &str| {
            user_commands
                .iter()
                .flat_map(|command| &command.aliases)
                .any(|user_alias| user_alias.as_str() == alias)
        };

        let help = (parsed.no_help.is_none() && !replaced(HELP_ALIAS)).then(|| CommandInfo {
            handler: quote! { ::parley::special::HelpCommand<Self> },
            aliases: vec![SpannedValue::new(HELP_ALIAS.to_owned(), Span::call_site())],
            description: quote! { ::parley::special::HelpCommand::<Self>::DESCRIPTION },
        });

        let version =
            (parsed.no_version.is_none() && !replaced(VERSION_ALIAS)).then(|| CommandInfo {
                handler: quote! { ::parley::special::VersionCommand<Self> },
                aliases: vec![SpannedValue::new(
                    VERSION_ALIAS.to_owned(),
                    Span::call_site(),
                )],
                description: quote! { ::parley::special::VersionCommand::<Self>::DESCRIPTION },
            });

        let commands: Vec<CommandInfo> = help
            .into_iter()
            .chain(version)
            .chain(user_commands)
            .collect();

        let mut known_aliases = HashMap::new();

        commands
            .iter()
            .flat_map(|command| &command.aliases)
            .try_for_each(|alias| {
                detect_collision(
                    &mut known_aliases,
                    Some(SpannedValue::new(alias.as_str(), alias.span())),
                    |alias| lazy_format!("special command alias: {alias}"),
                )
            })?;

        Ok(Self {
            name: parsed.name,
            version: parsed.version,
            copyright: parsed.copyright,
            help_text: parsed.help_text,
            messages: parsed.messages,
            commands,
        })
    }
}

fn command_info(command: &RawCommand) -> CommandInfo {
    CommandInfo {
        handler: command.handler.to_token_stream(),
        aliases: command.aliases.clone(),
        description: command.description.to_token_stream(),
    }
}

/**
Special command aliases are a name made of letters, digits, and internal
hyphens, optionally prefixed with `-` or `--`. The name can't start with a
digit.
 */
fn validate_alias(alias: &SpannedValue<String>) -> syn::Result<()> {
    let name = alias
        .strip_prefix("--")
        .or_else(|| alias.strip_prefix('-'))
        .unwrap_or(alias.as_str());

    let message = if name.is_empty() {
        Some("special command aliases need a name")
    } else if !name.starts_with(|c: char| c.is_alphabetic()) {
        Some("special command names must start with a letter")
    } else if name.ends_with('-') {
        Some("special command names can't end with '-'")
    } else if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        Some("special command names may only contain letters, digits, and hyphens")
    } else {
        None
    };

    match message {
        Some(message) => Err(syn::Error::new(alias.span(), message)),
        None => Ok(()),
    }
}
