use std::collections::HashMap;

use darling::{FromAttributes as _, util::SpannedValue};
use heck::ToKebabCase as _;
use lazy_format::lazy_format;
use syn::{Fields, Ident, Variant, ext::IdentExt as _, spanned::Spanned as _};

use super::detect_collision;

#[derive(darling::FromAttributes, Debug)]
#[darling(attributes(parley))]
struct RawVariantAttr {
    name: Option<SpannedValue<String>>,
}

pub struct AnalyzedEnum<'a> {
    /// The argument spelling of each variant, in declaration order
    pub variants: Vec<(String, &'a Ident)>,
}

impl<'a> AnalyzedEnum<'a> {
    pub fn from_variants(variants: impl IntoIterator<Item = &'a Variant>) -> syn::Result<Self> {
        let mut collected = Vec::new();

        for variant in variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new(
                    variant.fields.span(),
                    "`Value` can only be derived for enums whose variants have no fields",
                ));
            }

            let attr = RawVariantAttr::from_attributes(&variant.attrs)?;
            let name = attr.name.unwrap_or_else(|| {
                SpannedValue::new(
                    variant.ident.unraw().to_string().to_kebab_case(),
                    variant.ident.span(),
                )
            });

            if name.is_empty() {
                return Err(syn::Error::new(name.span(), "variant names can't be empty"));
            }

            collected.push((name, &variant.ident));
        }

        let mut known_names = HashMap::new();

        collected.iter().try_for_each(|(name, _)| {
            detect_collision(
                &mut known_names,
                Some(SpannedValue::new(name.as_str(), name.span())),
                |name| lazy_format!("variant name: {name:?}"),
            )
        })?;

        Ok(AnalyzedEnum {
            variants: collected
                .into_iter()
                .map(|(name, ident)| (name.as_str().to_owned(), ident))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use syn::{ItemEnum, parse_quote};

    use super::*;

    #[test]
    fn kebab_case_names() {
        let item: ItemEnum = parse_quote! {
            enum Mode {
                Fast,
                ExtraSlow,
                #[parley(name = "off")]
                Disabled,
            }
        };

        let analyzed = AnalyzedEnum::from_variants(&item.variants).unwrap();
        let names: Vec<&str> = analyzed
            .variants
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();

        assert_eq!(names, ["fast", "extra-slow", "off"]);
    }

    #[test]
    fn data_variants_are_rejected() {
        let item: ItemEnum = parse_quote! {
            enum Mode {
                Fast,
                Custom(u32),
            }
        };

        assert!(AnalyzedEnum::from_variants(&item.variants).is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let item: ItemEnum = parse_quote! {
            enum Mode {
                Fast,
                #[parley(name = "fast")]
                Quick,
            }
        };

        assert!(AnalyzedEnum::from_variants(&item.variants).is_err());
    }
}
