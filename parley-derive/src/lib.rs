mod common;
mod generics;
mod main_func;
mod parse;
mod value;

use proc_macro::TokenStream;

/// Derive `parley::Parse` for a struct with named fields. See the `parley`
/// crate documentation for the `#[parley(...)]` attributes.
#[proc_macro_derive(Parse, attributes(parley))]
pub fn derive_parse(item: TokenStream) -> TokenStream {
    match parse::derive_parse_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive `parley::Value` for a fieldless enum, matched by the kebab-case
/// variant names, or for a newtype struct, which delegates to its field.
#[proc_macro_derive(Value, attributes(parley))]
pub fn derive_value(item: TokenStream) -> TokenStream {
    match value::derive_value_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_attribute]
pub fn main(attrs: TokenStream, item: TokenStream) -> TokenStream {
    match main_func::decorate_fn_main(attrs.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
