pub mod known_types;
pub mod model;
pub mod program;
pub mod value;

use std::collections::{HashMap, hash_map::Entry};
use std::fmt::Display;
use std::hash::Hash;

use darling::{
    FromAttributes as _,
    util::{Override, SpannedValue},
};
use heck::ToKebabCase as _;
use itertools::Itertools as _;
use lazy_format::lazy_format;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::ToTokens;
use syn::{Attribute, Expr, Field, Ident, Meta, Type, ext::IdentExt as _, spanned::Spanned as _};

use self::known_types::{KnownTypes, TypeShape, Wrapper};

pub struct IdentString<'a> {
    raw: &'a Ident,
    string: String,
}

impl<'a> IdentString<'a> {
    pub fn new(ident: &'a Ident) -> Self {
        Self {
            string: ident.unraw().to_string(),
            raw: ident,
        }
    }

    /// The identifier without any `r#` prefix
    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }

}

impl ToTokens for IdentString<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        self.raw.to_tokens(tokens);
    }
}

/// Record `new_tag` in `known_tags`, or fail with an error pointing at both
/// uses if it was already there.
pub fn detect_collision<T: Hash + Eq + Copy, M: Display>(
    known_tags: &mut HashMap<T, Span>,
    new_tag: Option<SpannedValue<T>>,
    message: impl Fn(T) -> M,
) -> syn::Result<()> {
    match new_tag {
        Some(tag) => match known_tags.entry(*tag) {
            Entry::Occupied(entry) => {
                let mut err1 = syn::Error::new(
                    tag.span(),
                    lazy_format!("duplicate {tag}", tag = message(*tag)),
                );
                let err2 = syn::Error::new(*entry.get(), "original use here");

                err1.combine(err2);
                Err(err1)
            }
            Entry::Vacant(entry) => {
                entry.insert(tag.span());
                Ok(())
            }
        },
        None => Ok(()),
    }
}

#[derive(darling::FromAttributes, Debug)]
#[darling(attributes(parley))]
struct RawParsedAttr {
    option: Option<()>,
    long: Option<Override<SpannedValue<String>>>,
    short: Option<Override<SpannedValue<char>>>,
    no_long: Option<()>,
    remaining: Option<()>,
    index: Option<SpannedValue<usize>>,
    name: Option<SpannedValue<String>>,
    required: Option<()>,
    #[darling(default, with = parse_default)]
    default: Option<Override<Expr>>,
}

/// `default` alone means `Default::default()`; `default = expr` takes any
/// expression, not just a string literal.
fn parse_default(meta: &Meta) -> darling::Result<Option<Override<Expr>>> {
    match *meta {
        Meta::Path(_) => Ok(Some(Override::Inherit)),
        Meta::NameValue(ref pair) => Ok(Some(Override::Explicit(pair.value.clone()))),
        Meta::List(_) => Err(darling::Error::unsupported_format("list").with_span(meta)),
    }
}

impl RawParsedAttr {
    fn is_option(&self) -> bool {
        self.option.is_some()
            || self.long.is_some()
            || self.short.is_some()
            || self.no_long.is_some()
    }
}

pub enum FieldDefault {
    None,
    Trait,
    Expr(Expr),
}

impl FieldDefault {
    pub fn new(default: Option<Override<Expr>>) -> Self {
        match default {
            Some(Override::Explicit(default)) => Self::Expr(default),
            Some(Override::Inherit) => Self::Trait,
            None => Self::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(*self, FieldDefault::None)
    }
}

pub enum OptionTag {
    Long(SpannedValue<String>),
    Short(SpannedValue<char>),
    LongShort {
        long: SpannedValue<String>,
        short: SpannedValue<char>,
    },
}

impl OptionTag {
    pub fn long(&self) -> Option<SpannedValue<&str>> {
        match *self {
            OptionTag::Long(ref long) | OptionTag::LongShort { ref long, .. } => {
                Some(SpannedValue::new(long.as_str(), long.span()))
            }
            OptionTag::Short(_) => None,
        }
    }

    pub fn short(&self) -> Option<SpannedValue<char>> {
        match *self {
            OptionTag::Short(short) | OptionTag::LongShort { short, .. } => Some(short),
            OptionTag::Long(_) => None,
        }
    }
}

/// Everything every kind of field has in common
pub struct FieldBase<'a> {
    pub ident: IdentString<'a>,
    pub ty: &'a Type,
    pub shape: TypeShape<'a>,
    pub default: FieldDefault,
    pub docs: String,
    pub required: bool,
}

pub struct OptionFieldInfo<'a> {
    pub base: FieldBase<'a>,
    pub tags: OptionTag,
}

pub struct ParameterFieldInfo<'a> {
    pub base: FieldBase<'a>,
    pub name: SpannedValue<String>,
    pub index: Option<SpannedValue<usize>>,
}

pub struct RemainingFieldInfo<'a> {
    pub base: FieldBase<'a>,
    pub name: SpannedValue<String>,
}

/// Collect the `///` doc comments on an item: one line per attribute, with
/// surrounding whitespace trimmed.
pub fn compute_docs(attrs: &[Attribute]) -> syn::Result<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| match attr.meta {
            syn::Meta::NameValue(ref meta) => Some(meta),
            _ => None,
        })
        .filter(|meta| meta.path.is_ident("doc"))
        .map(|meta| match meta.value {
            Expr::Lit(ref lit) => match lit.lit {
                syn::Lit::Str(ref lit) => Ok(lit.value()),
                _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
            },
            Expr::Macro(ref expr) => Err(syn::Error::new(
                expr.span(),
                "macro #[doc] attributes aren't supported",
            )),
            _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
        })
        .try_collect()?;

    Ok(lines.iter().map(|line| line.trim()).join("\n").trim().to_owned())
}

pub enum ParsedFieldInfo<'a> {
    Option(OptionFieldInfo<'a>),
    Parameter(ParameterFieldInfo<'a>),
    Remaining(RemainingFieldInfo<'a>),
}

impl<'a> ParsedFieldInfo<'a> {
    pub fn from_field(field: &'a Field, known_types: &KnownTypes) -> syn::Result<Self> {
        let parsed = RawParsedAttr::from_attributes(&field.attrs)?;
        let docs = compute_docs(&field.attrs)?;

        let ident = field.ident.as_ref().map(IdentString::new).ok_or_else(|| {
            syn::Error::new(
                field.span(),
                "can only derive `Parse` on structs with named fields",
            )
        })?;

        let ty = &field.ty;
        let shape = known_types.shape(ty)?;
        let default = FieldDefault::new(parsed.default.clone());
        let explicit_required = parsed.required.is_some();

        if explicit_required && !default.is_none() {
            return Err(syn::Error::new(
                field.span(),
                "a field with a `default` can't also be `required`",
            ));
        }

        let required = explicit_required
            || (shape.wrapper.is_none() && !shape.flag && default.is_none());

        let base = FieldBase {
            ident,
            ty,
            shape,
            default,
            docs,
            required,
        };

        if parsed.remaining.is_some() {
            return compute_remaining(parsed, base, explicit_required, field)
                .map(Self::Remaining);
        }

        if parsed.is_option() {
            return compute_option(parsed, base, explicit_required, field).map(Self::Option);
        }

        if base.shape.wrapper == Some(Wrapper::Sequence) {
            return Err(syn::Error::new(
                ty.span(),
                "positional parameters can't be sequences; \
                use #[parley(remaining)] to collect the remaining arguments",
            ));
        }

        let name = compute_name(parsed.name, &base.ident)?;

        Ok(Self::Parameter(ParameterFieldInfo {
            base,
            name,
            index: parsed.index,
        }))
    }

    pub fn base(&self) -> &FieldBase<'a> {
        match self {
            ParsedFieldInfo::Option(info) => &info.base,
            ParsedFieldInfo::Parameter(info) => &info.base,
            ParsedFieldInfo::Remaining(info) => &info.base,
        }
    }

    pub fn as_option(&self) -> Option<&OptionFieldInfo<'a>> {
        match self {
            ParsedFieldInfo::Option(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterFieldInfo<'a>> {
        match self {
            ParsedFieldInfo::Parameter(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_remaining(&self) -> Option<&RemainingFieldInfo<'a>> {
        match self {
            ParsedFieldInfo::Remaining(info) => Some(info),
            _ => None,
        }
    }
}

fn compute_remaining<'a>(
    parsed: RawParsedAttr,
    base: FieldBase<'a>,
    explicit_required: bool,
    field: &Field,
) -> syn::Result<RemainingFieldInfo<'a>> {
    if parsed.is_option() {
        Err(syn::Error::new(
            field.span(),
            "`remaining` can't be combined with option attributes",
        ))
    } else if let Some(index) = parsed.index {
        Err(syn::Error::new(
            index.span(),
            "`remaining` collects everything after the last indexed parameter, \
            so it can't have an `index`",
        ))
    } else if explicit_required {
        Err(syn::Error::new(
            field.span(),
            "`remaining` can't be `required`",
        ))
    } else if base.shape.wrapper != Some(Wrapper::Sequence) {
        Err(syn::Error::new(
            base.ty.span(),
            "`remaining` must be a sequence, like `Vec<T>`",
        ))
    } else {
        let name = compute_name(parsed.name, &base.ident)?;
        Ok(RemainingFieldInfo { base, name })
    }
}

fn compute_option<'a>(
    parsed: RawParsedAttr,
    base: FieldBase<'a>,
    explicit_required: bool,
    field: &Field,
) -> syn::Result<OptionFieldInfo<'a>> {
    if let Some(index) = parsed.index {
        return Err(syn::Error::new(
            index.span(),
            "options are named, so they can't have an `index`",
        ));
    }

    if let Some(name) = parsed.name {
        return Err(syn::Error::new(
            name.span(),
            "options don't have a parameter `name`; use `long` instead",
        ));
    }

    if base.shape.flag {
        if base.shape.wrapper == Some(Wrapper::Sequence) {
            return Err(syn::Error::new(
                base.ty.span(),
                "flags can't be collected into a sequence",
            ));
        }

        if explicit_required {
            return Err(syn::Error::new(
                field.span(),
                "flags are set by their presence, so they can't be `required`",
            ));
        }
    }

    let long = match (parsed.no_long, parsed.long) {
        (Some(()), Some(_)) => {
            return Err(syn::Error::new(
                field.span(),
                "`no_long` conflicts with `long`",
            ));
        }
        (Some(()), None) => None,
        (None, long) => Some(compute_long(
            long.and_then(Override::explicit),
            &base.ident,
        )?),
    };

    let short = parsed
        .short
        .map(|short| compute_short(short.explicit(), &base.ident))
        .transpose()?;

    let tags = match (long, short) {
        (None, None) => {
            return Err(syn::Error::new(
                field.span(),
                "an option with `no_long` needs a `short` tag",
            ));
        }
        (Some(long), None) => OptionTag::Long(long),
        (None, Some(short)) => OptionTag::Short(short),
        (Some(long), Some(short)) => OptionTag::LongShort { long, short },
    };

    Ok(OptionFieldInfo { base, tags })
}

fn compute_long(
    long: Option<SpannedValue<String>>,
    field_name: &IdentString<'_>,
) -> syn::Result<SpannedValue<String>> {
    let long = long.unwrap_or_else(|| {
        SpannedValue::new(field_name.as_str().to_kebab_case(), field_name.span())
    });

    if long.starts_with("--") {
        Err(syn::Error::new(
            long.span(),
            "long options don't need to start with --; this is handled automatically",
        ))
    } else if long.starts_with('-') {
        Err(syn::Error::new(long.span(), "long options don't start with '-'"))
    } else if !long.starts_with(|c: char| c.is_alphabetic()) {
        Err(syn::Error::new(
            long.span(),
            "long options should start with something alphabetic",
        ))
    } else if long.contains('=') {
        Err(syn::Error::new(
            long.span(),
            "long options must not include an '=', as it is the argument separator",
        ))
    } else if long.contains(|c: char| c.is_whitespace()) {
        Err(syn::Error::new(
            long.span(),
            "long options shouldn't include whitespace",
        ))
    } else {
        Ok(long)
    }
}

fn compute_short(
    short: Option<SpannedValue<char>>,
    field_name: &IdentString<'_>,
) -> syn::Result<SpannedValue<char>> {
    let c = match short {
        Some(short) => short,
        None => match field_name.as_str().chars().next() {
            Some(c) => SpannedValue::new(c, field_name.span()),
            None => return Err(syn::Error::new(field_name.span(), "empty identifier")),
        },
    };

    if *c == '-' {
        Err(syn::Error::new(c.span(), "short option must not be '-'"))
    } else if !c.is_alphabetic() {
        Err(syn::Error::new(
            c.span(),
            "short options must be letters, so that they aren't mistaken for numbers",
        ))
    } else {
        Ok(c)
    }
}

/// The name of a positional parameter, used in help and errors
fn compute_name(
    name: Option<SpannedValue<String>>,
    field_name: &IdentString<'_>,
) -> syn::Result<SpannedValue<String>> {
    let name = name.unwrap_or_else(|| {
        SpannedValue::new(field_name.as_str().to_kebab_case(), field_name.span())
    });

    if name.is_empty() {
        Err(syn::Error::new(name.span(), "parameter names can't be empty"))
    } else if name.contains(|c: char| c.is_whitespace()) {
        Err(syn::Error::new(
            name.span(),
            "parameter names shouldn't include whitespace",
        ))
    } else {
        Ok(name)
    }
}
