use core::fmt::{self, Display, Write as _};

use indent_write::fmt::IndentWriter;
use joinery::JoinableIterator;
use lazy_format::lazy_format;

use crate::{
    errors::ParseErrors,
    model::{Model, OptionSpec, ParameterSpec, RemainingSpec, SpecialCommandSpec},
};

/*
Overall structure:

name 1.0.0
Copyright (C) someone

ERROR(S):
  message

OPTIONS:
  -s, --long	description

PARAMETERS:
  input	description
  rest...	description

COMMANDS:
  --help	Show help screen
 */
pub fn print_help<S: 'static>(
    out: &mut (impl fmt::Write + ?Sized),
    model: &Model<S>,
    errors: Option<&ParseErrors>,
) -> fmt::Result {
    let info = &model.info;

    writeln!(out, "{} {}", info.name, info.version)?;

    if let Some(copyright) = info.copyright {
        writeln!(out, "Copyright (C) {copyright}")?;
    }

    if let Some(errors) = errors {
        section(out, "ERROR(S)", |mut out| {
            errors
                .messages(info.messages)
                .try_for_each(|message| writeln!(out, "{message}"))
        })?;
    }

    maybe_section(out, "OPTIONS", model.options, |out, option| {
        print_option(out, option)
    })?;

    let parameters = model
        .parameters
        .iter()
        .map(Positional::Parameter)
        .chain(model.remaining.as_ref().map(Positional::Remaining));

    maybe_section(out, "PARAMETERS", parameters, |out, positional| {
        print_positional(out, positional)
    })?;

    maybe_section(out, "COMMANDS", model.commands, |out, command| {
        print_command(out, command)
    })
}

enum Positional<'a, S> {
    Parameter(&'a ParameterSpec<S>),
    Remaining(&'a RemainingSpec<S>),
}

fn print_option<S>(out: &mut (impl fmt::Write + ?Sized), option: &OptionSpec<S>) -> fmt::Result {
    describe(out, option.tags, option.description)
}

fn print_positional<S>(
    out: &mut (impl fmt::Write + ?Sized),
    positional: Positional<'_, S>,
) -> fmt::Result {
    let (name, repeated, description) = match positional {
        Positional::Parameter(parameter) => (parameter.name, false, parameter.description),
        Positional::Remaining(remaining) => (remaining.name, true, remaining.description),
    };

    let name = lazy_format!(match (repeated) {
        false => "{name}",
        true => "{name}...",
    });

    describe(out, name, description)
}

fn print_command(
    out: &mut (impl fmt::Write + ?Sized),
    command: &SpecialCommandSpec,
) -> fmt::Result {
    describe(
        out,
        command.aliases.iter().join_with(", "),
        command.description,
    )
}

/// Write a section by writing a newline, then the `header`, then an
/// indented `body`.
fn section<O: fmt::Write + ?Sized, T>(
    out: &mut O,
    header: &str,
    body: impl FnOnce(IndentWriter<'static, &mut O>) -> Result<T, fmt::Error>,
) -> Result<T, fmt::Error> {
    writeln!(out, "\n{header}:")?;
    body(IndentWriter::new("  ", out))
}

/// Write an optional section, only if the iterator is not empty.
/// Otherwise identical to `section`.
fn maybe_section<O: fmt::Write + ?Sized, I: IntoIterator>(
    out: &mut O,
    header: &str,
    items: I,
    body: impl Fn(&mut IndentWriter<'static, &mut O>, I::Item) -> fmt::Result,
) -> fmt::Result {
    let mut items = items.into_iter();

    match items.next() {
        None => Ok(()),
        Some(first) => section(out, header, |mut out| {
            body(&mut out, first)?;
            items.try_for_each(|item| body(&mut out, item))
        }),
    }
}

/// Describe an item on a single line: the item, then a tab, then the
/// description collapsed onto one line. The tab is left off if there's no
/// description.
fn describe(
    out: &mut (impl fmt::Write + ?Sized),
    item: impl Display,
    description: &str,
) -> fmt::Result {
    let description = description.trim();

    if description.is_empty() {
        return writeln!(out, "{item}");
    }

    let (description, _) = textwrap::unfill(description);
    writeln!(out, "{item}\t{description}")
}

#[cfg(test)]
mod tests {
    use core::fmt::Write as _;

    use super::*;
    use crate::model::ProgramInfo;

    #[test]
    fn title_only() {
        let model: Model<()> = Model {
            info: ProgramInfo {
                name: "empty",
                version: "0.1.0",
                copyright: Some("2026 Nobody"),
                help_text: None,
                messages: None,
            },
            options: &[],
            parameters: &[],
            remaining: None,
            commands: &[],
        };

        let mut out = String::new();
        print_help(&mut out, &model, None).unwrap();
        assert_eq!(out, "empty 0.1.0\nCopyright (C) 2026 Nobody\n");
    }

    #[test]
    fn describe_without_description() {
        let mut out = String::new();
        describe(&mut out, "--flag", "  ").unwrap();
        assert_eq!(out, "--flag\n");
    }

    #[test]
    fn describe_collapses_lines() {
        let mut out = String::new();
        describe(&mut out, "--flag", "Turn on\nthe flag").unwrap();
        assert_eq!(out, "--flag\tTurn on the flag\n");
    }

    #[test]
    fn empty_sections_are_skipped() {
        let mut out = String::new();
        maybe_section(&mut out, "EMPTY", [] as [&str; 0], |out, item| {
            writeln!(out, "{item}")
        })
        .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn sections_are_indented() {
        let mut out = String::new();
        maybe_section(&mut out, "ITEMS", ["a", "b"], |out, item| {
            writeln!(out, "{item}")
        })
        .unwrap();
        assert_eq!(out, "\nITEMS:\n  a\n  b\n");
    }
}
