/*!
Checks that span multiple fields: tag collisions, parameter ordering, and
the single `remaining` field.
*/

use std::collections::HashMap;

use darling::util::SpannedValue;
use lazy_format::lazy_format;
use syn::spanned::Spanned as _;

use super::{ParameterFieldInfo, ParsedFieldInfo, RemainingFieldInfo, detect_collision};

pub fn check_tag_collisions(fields: &[ParsedFieldInfo<'_>]) -> syn::Result<()> {
    let mut long_tags = HashMap::new();
    let mut short_tags = HashMap::new();

    fields
        .iter()
        .filter_map(|field| field.as_option())
        .try_for_each(|option| {
            detect_collision(&mut long_tags, option.tags.long(), |long| {
                lazy_format!("long option: --{long}")
            })?;

            detect_collision(&mut short_tags, option.tags.short(), |short| {
                lazy_format!("short option: -{short}")
            })
        })
}

pub struct IndexedParameter<'f, 'a> {
    pub index: usize,
    pub info: &'f ParameterFieldInfo<'a>,
}

/**
Put the positional parameters in order. Either every parameter has an
explicit `index` or none do; without them, parameters are numbered in
declaration order. Indexes must count up from 0 without gaps, and no
required parameter may come after an optional one.
 */
pub fn resolve_parameters<'f, 'a>(
    fields: &'f [ParsedFieldInfo<'a>],
) -> syn::Result<Vec<IndexedParameter<'f, 'a>>> {
    let parameters: Vec<&ParameterFieldInfo<'a>> =
        fields.iter().filter_map(|field| field.as_parameter()).collect();

    let explicit = parameters.iter().filter(|info| info.index.is_some()).count();

    let mut indexed: Vec<IndexedParameter<'f, 'a>> = if explicit == 0 {
        parameters
            .into_iter()
            .enumerate()
            .map(|(index, info)| IndexedParameter { index, info })
            .collect()
    } else if let Some(missing) = parameters.iter().find(|info| info.index.is_none()) {
        return Err(syn::Error::new(
            missing.base.ident.span(),
            "if any positional parameter has an `index`, all of them must",
        ));
    } else {
        let mut known_indexes = HashMap::new();

        parameters
            .into_iter()
            .map(|info| {
                let index = info.index.as_ref().map(|index| {
                    SpannedValue::new(**index, index.span())
                });

                detect_collision(&mut known_indexes, index, |index| {
                    lazy_format!("parameter index: {index}")
                })?;

                Ok(IndexedParameter {
                    index: info.index.as_deref().copied().unwrap_or_default(),
                    info,
                })
            })
            .collect::<syn::Result<_>>()?
    };

    indexed.sort_by_key(|parameter| parameter.index);

    if let Some((expected, parameter)) = indexed
        .iter()
        .enumerate()
        .find(|&(expected, parameter)| parameter.index != expected)
    {
        return Err(syn::Error::new(
            parameter.info.base.ident.span(),
            lazy_format!(
                "parameter indexes must count up from 0 without gaps; \
                expected index {expected} here"
            ),
        ));
    }

    if let Some(misplaced) = indexed
        .iter()
        .skip_while(|parameter| parameter.info.base.required)
        .find(|parameter| parameter.info.base.required)
    {
        return Err(syn::Error::new(
            misplaced.info.base.ident.span(),
            "a required parameter can't come after an optional one",
        ));
    }

    Ok(indexed)
}

pub fn find_remaining<'f, 'a>(
    fields: &'f [ParsedFieldInfo<'a>],
) -> syn::Result<Option<&'f RemainingFieldInfo<'a>>> {
    let mut remaining = fields.iter().filter_map(|field| field.as_remaining());

    let first = remaining.next();

    match remaining.next() {
        None => Ok(first),
        Some(second) => {
            let mut err = syn::Error::new(
                second.base.ident.span(),
                "only one field can collect the `remaining` parameters",
            );

            if let Some(first) = first {
                err.combine(syn::Error::new(
                    first.base.ident.span(),
                    "first `remaining` field here",
                ));
            }

            Err(err)
        }
    }
}
