/*!
Rendering of the help screen.

The default layout lists the title, an optional copyright line, the errors
(if any), and then the options, parameters, and special commands of the
model. A type can replace the entire screen with
`#[parley(help_text = "path::to::function")]`, or only the per-error
messages with `#[parley(messages = "path::to::TABLE")]`.
*/

use crate::{errors::ParseErrors, model::Model, printers::print_help};

/// Render the help screen for `model`, honoring its overrides.
pub fn render<S: 'static>(model: &Model<S>, errors: Option<&ParseErrors>) -> String {
    match model.info.help_text {
        Some(help_text) => help_text(errors),
        None => render_default(model, errors),
    }
}

/// Render the help screen for `model` with the default layout, ignoring any
/// `help_text` override. Useful for overrides that want to decorate the
/// default screen.
pub fn render_default<S: 'static>(model: &Model<S>, errors: Option<&ParseErrors>) -> String {
    let mut out = String::new();

    // Writing to a `String` can't fail
    let _ = print_help(&mut out, model, errors);
    out
}
