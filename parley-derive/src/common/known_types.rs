/*!
Recognition of the wrapper types that change how a field is parsed.

Wrappers are matched by the name of the last path segment, so both
`Option<T>` and `::core::option::Option<T>` are recognized. Only one level
of wrapping is understood.
*/

use syn::{GenericArgument, PathArguments, Type, spanned::Spanned as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    /// `Option<T>`: absent unless given
    Nullable,

    /// A collection that accumulates every value given
    Sequence,
}

#[derive(Debug, Clone, Copy)]
pub struct TypeShape<'a> {
    pub wrapper: Option<Wrapper>,

    /// The type that each individual argument is parsed into
    pub scalar: &'a Type,

    /// True if `scalar` is `bool`
    pub flag: bool,
}

/// The wrapper types recognized for a single derive.
pub struct KnownTypes {
    nullable: &'static [&'static str],
    sequence: &'static [&'static str],
}

impl KnownTypes {
    pub fn new() -> Self {
        Self {
            nullable: &["Option"],
            sequence: &[
                "Vec",
                "VecDeque",
                "LinkedList",
                "BTreeSet",
                "HashSet",
                "BinaryHeap",
            ],
        }
    }

    fn wrapper_of<'a>(&self, ty: &'a Type) -> Option<(Wrapper, &'a Type)> {
        let Type::Path(path) = strip_groups(ty) else {
            return None;
        };

        if path.qself.is_some() {
            return None;
        }

        let segment = path.path.segments.last()?;

        let wrapper = if self.nullable.iter().any(|&name| segment.ident == name) {
            Wrapper::Nullable
        } else if self.sequence.iter().any(|&name| segment.ident == name) {
            Wrapper::Sequence
        } else {
            return None;
        };

        let PathArguments::AngleBracketed(ref args) = segment.arguments else {
            return None;
        };

        // `HashSet<T, S>` has a hasher parameter; the element always comes first
        let inner = args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })?;

        Some((wrapper, inner))
    }

    pub fn shape<'a>(&self, ty: &'a Type) -> syn::Result<TypeShape<'a>> {
        match self.wrapper_of(ty) {
            None => Ok(TypeShape {
                wrapper: None,
                scalar: ty,
                flag: is_bool(ty),
            }),
            Some((wrapper, inner)) => match self.wrapper_of(inner) {
                Some(_) => Err(syn::Error::new(
                    inner.span(),
                    "nested wrapper types like `Option<Vec<T>>` aren't supported",
                )),
                None => Ok(TypeShape {
                    wrapper: Some(wrapper),
                    scalar: inner,
                    flag: is_bool(inner),
                }),
            },
        }
    }
}

fn strip_groups(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => strip_groups(&group.elem),
        Type::Paren(paren) => strip_groups(&paren.elem),
        ty => ty,
    }
}

fn is_bool(ty: &Type) -> bool {
    match strip_groups(ty) {
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("bool"),
        _ => false,
    }
}
