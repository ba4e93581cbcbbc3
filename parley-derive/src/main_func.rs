use itertools::Itertools;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::ToTokens;
use syn::{
    Attribute, FnArg, ItemFn, PatType, Stmt, parse_quote, punctuated::Punctuated,
    spanned::Spanned, token::Comma,
};

fn is_args_attr(attr: &Attribute) -> bool {
    match attr.meta.require_path_only() {
        Ok(path) => path.is_ident("args"),
        Err(_) => false,
    }
}

fn extract_args_fn_input(
    args: impl IntoIterator<Item = FnArg>,
    span: Span,
) -> syn::Result<(PatType, Punctuated<FnArg, Comma>)> {
    let args = args.into_iter();
    let mut args = match args.at_most_one() {
        Ok(None) => {
            return Err(syn::Error::new(
                span,
                "#[parley::main] function requires an argument to receive \
                the parsed command line",
            ));
        }
        Ok(Some(FnArg::Typed(arg))) => return Ok((arg, Punctuated::new())),
        Ok(Some(FnArg::Receiver(_))) => {
            return Err(syn::Error::new(
                span,
                "#[parley::main] function requires an argument \
                (`self` doesn't count)",
            ));
        }

        Err(args) => args,
    };

    let mut inputs = Punctuated::new();

    let arg = args
        .find_map(|arg| {
            let arg = match arg {
                FnArg::Typed(arg) if arg.attrs.iter().any(is_args_attr) => {
                    return Some(arg);
                }
                arg => arg,
            };

            inputs.push(arg);
            None
        })
        .ok_or_else(|| {
            syn::Error::new(
                span,
                "#[parley::main] function with more than one argument must \
                use #[args] to identify the command line arguments parameter",
            )
        })?;

    inputs.extend(args);
    Ok((arg, inputs))
}

/**
Rewrite `fn main(args: Args)` so that the arguments are loaded from the
environment and parsed into `Args` at the top of the function body. Parse
errors print the help screen to stderr and exit; special commands like
`--help` run and exit.
 */
pub fn decorate_fn_main(attrs: TokenStream2, function: TokenStream2) -> syn::Result<TokenStream2> {
    if let Some(token) = attrs.into_iter().next() {
        return Err(syn::Error::new(
            token.span(),
            "#[parley::main] doesn't take any arguments",
        ));
    }

    let mut function: ItemFn = syn::parse2(function)?;

    // Identify the argument. It's probably the only argument, but we'll also
    // accept an argument tagged with #[args].
    let inputs_span = function.sig.paren_token.span.join();
    let (arg, updated_inputs) = extract_args_fn_input(function.sig.inputs, inputs_span)?;
    function.sig.inputs = updated_inputs;

    if let Some(weird) = arg.attrs.iter().find(|attr| !is_args_attr(attr)) {
        return Err(syn::Error::new(
            weird.span(),
            "unrecognized attribute on #[parley::main] arguments parameter",
        ));
    }

    let user_pattern = &arg.pat;
    let user_type = &arg.ty;

    let body_prefix: Stmt = parse_quote! {
        let #user_pattern: #user_type =
            ::parley::arguments::LoadedArguments::from_env().parse_or_exit();
    };

    function.block.stmts.insert(0, body_prefix);

    Ok(function.into_token_stream())
}
