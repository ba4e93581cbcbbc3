use syn::{Generics, spanned::Spanned as _};

/// Parsed types own all of their data and are described by a `const` model,
/// so none of the parley derives support generic parameters of any kind.
pub fn reject_generics(generics: &Generics, derive: &str) -> syn::Result<()> {
    if let Some(param) = generics.const_params().next() {
        return Err(syn::Error::new(
            param.span(),
            format_args!("const generics aren't supported by `derive({derive})`"),
        ));
    }

    if let Some(param) = generics.type_params().next() {
        return Err(syn::Error::new(
            param.span(),
            format_args!("generic types aren't supported by `derive({derive})`"),
        ));
    }

    if let Some(param) = generics.lifetimes().next() {
        return Err(syn::Error::new(
            param.span(),
            format_args!(
                "`derive({derive})` types can't borrow from the arguments; \
                use owned types like `String` instead"
            ),
        ));
    }

    Ok(())
}
