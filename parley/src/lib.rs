/*!
A table-driven command line arguments parsing library. Parley reads the whole
command line in one pass and reports *every* problem it finds, instead of
giving up at the first one.

Most users only need the macros:

- [`#[derive(Parse)]`][Parse] turns a struct into an options model. The
  `#[parley]` attribute marks fields as options (`short`, `long`, `option`),
  positional parameters (the default; `index`, `name`), or the collector for
  any remaining positional arguments (`remaining`). Fields can be `required`
  or have a `default`. On the struct itself, `command(...)` adds special
  commands, and `name`, `version`, `copyright`, `help_text`, and `messages`
  customize the help screen.

- [`#[derive(Value)]`][Value] makes a fieldless enum (or a newtype struct)
  usable as an argument value.

- [`#[parley::main]`][main] can be placed on your `main` function to make the
  parsed arguments available as a function argument.

The derive produces a [`Model`][model::Model] table for the type, which the
interpreter in [`machine`] runs over the arguments. The result is a
[`ParseResult`]: the options, a non-empty set of [`ParseError`]s, or a
[`SpecialCommand`] such as `--help` that should run instead.
*/

pub mod arguments;
pub mod errors;
pub mod help;
mod impls;
pub mod machine;
pub mod model;
mod printers;
pub mod result;
pub mod special;
mod util;
pub mod value;

use core::fmt;

pub use parley_derive::{Parse, Value, main};

pub use errors::{ErrorKind, ParseError, ParseErrors};
pub use result::ParseResult;
pub use special::{SpecialCommand, SpecialCommandHandler};
pub use value::{ParsedValue, Value, ValueError};

/// The set of tags that identify a particular option (`-short`, `--long`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tags<'a> {
    /// This option uses only a long tag
    Long { long: &'a str },

    /// This option uses only a short tag
    Short { short: char },

    /// This option uses both a long and short tag
    LongShort { long: &'a str, short: char },
}

impl<'a> Tags<'a> {
    /// Get the long tag, if any
    #[inline]
    #[must_use]
    pub const fn long(&self) -> Option<&'a str> {
        match self {
            Tags::Long { long } | Tags::LongShort { long, .. } => Some(long),
            Tags::Short { .. } => None,
        }
    }

    /// Get the short tag, if any
    #[inline]
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        match self {
            Tags::Short { short } | Tags::LongShort { short, .. } => Some(*short),
            Tags::Long { .. } => None,
        }
    }
}

/// Tags print the way they appear in a help screen: `-s, --long`
impl fmt::Display for Tags<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Tags::Long { long } => write!(f, "--{long}"),
            Tags::Short { short } => write!(f, "-{short}"),
            Tags::LongShort { long, short } => write!(f, "-{short}, --{long}"),
        }
    }
}

/**
A type that can be parsed from command line arguments. Usually derived with
[`#[derive(Parse)]`][derive@Parse]; the derive produces the [`MODEL`][Parse::MODEL]
table, its storage [`State`][Parse::State], and [`build`][Parse::build].
*/
pub trait Parse: Sized {
    /// Per-field storage filled in while arguments are being parsed
    #[doc(hidden)]
    type State: Default + 'static;

    /// The normalized description of this type's options, parameters, and
    /// special commands.
    const MODEL: model::Model<Self::State>;

    /**
    Assemble the final value after every argument has been consumed
    without error. Absent fields get their defaults here; a required field
    that is still empty is reported as missing.
    */
    fn build(state: Self::State) -> Result<Self, ParseError>;

    /**
    Parse a list of arguments. The list should *exclude* the name of the
    program, which is commonly passed as the first argument.

    This never panics: malformed input of any kind is reported through
    [`ParseResult::Errors`].
    */
    fn parse<I>(args: I) -> ParseResult<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        machine::run(args)
    }

    /// Render the help screen for this type, optionally including a list of
    /// errors. Honors `#[parley(help_text = ...)]` overrides.
    fn help_text(errors: Option<&ParseErrors>) -> String {
        help::render(&Self::MODEL, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::Tags;

    #[test]
    fn tags_display() {
        assert_eq!(Tags::Long { long: "out" }.to_string(), "--out");
        assert_eq!(Tags::Short { short: 'o' }.to_string(), "-o");
        assert_eq!(
            Tags::LongShort {
                long: "out",
                short: 'o'
            }
            .to_string(),
            "-o, --out"
        );
    }

    #[test]
    fn tags_accessors() {
        let tags = Tags::LongShort {
            long: "out",
            short: 'o',
        };

        assert_eq!(tags.long(), Some("out"));
        assert_eq!(tags.short(), Some('o'));
        assert_eq!(Tags::Short { short: 'x' }.long(), None);
        assert_eq!(Tags::Long { long: "x" }.short(), None);
    }
}
