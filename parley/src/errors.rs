/*!
The errors produced while parsing, and the machinery for rendering them.

Parsing never stops at the first problem. Every [`ParseError`] found in a pass
is collected into [`ParseErrors`], an insertion-ordered set: an error that is
structurally identical to one already recorded is dropped.
*/

use core::fmt;

use indexmap::IndexSet;

use crate::Tags;

/// A single problem found in the command line arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseError {
    /// An option that isn't in the model: `--nope` or the `x` in `-vx`
    #[error("unknown option {option:?} in argument {argument:?}")]
    UnknownOption { option: String, argument: String },

    /// A positional argument that nothing could accept, or a malformed
    /// `--=value`
    #[error("unrecognized argument {argument:?}")]
    UnrecognizedArgument { argument: String },

    /// An option that needed a value, but didn't get one
    #[error("option {option:?} requires a value")]
    OptionValueMissing { option: String },

    /// An option appeared more than once
    #[error("option {option:?} appeared more than once")]
    DuplicateOption { option: String },

    #[error("option {option:?} can't accept {value:?}")]
    BadOptionValueFormat { value: String, option: String },

    #[error("parameter <{parameter}> (position {index}) can't accept {value:?}")]
    BadParameterValueFormat {
        value: String,
        parameter: &'static str,
        index: usize,
    },

    /// `index` counts from the first remaining argument
    #[error("remaining argument {index} can't accept {value:?}")]
    BadRemainingParameterValueFormat { value: String, index: usize },

    /// A flag was given an inline value, as in `--verbose=yes`
    #[error("option {option:?} is a flag and doesn't take a value (got {value:?})")]
    FlagOptionValue { option: String, value: String },

    #[error("required option {tags} was omitted")]
    MissingRequiredOption { tags: Tags<'static> },

    #[error("required parameter <{parameter}> (position {index}) was omitted")]
    MissingRequiredParameter {
        parameter: &'static str,
        index: usize,
    },
}

/// The fieldless discriminant of a [`ParseError`], used to key a
/// [`MessageTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownOption,
    UnrecognizedArgument,
    OptionValueMissing,
    DuplicateOption,
    BadOptionValueFormat,
    BadParameterValueFormat,
    BadRemainingParameterValueFormat,
    FlagOptionValue,
    MissingRequiredOption,
    MissingRequiredParameter,
}

impl ErrorKind {
    /// The number of error kinds
    pub const COUNT: usize = 10;
}

impl ParseError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            ParseError::UnknownOption { .. } => ErrorKind::UnknownOption,
            ParseError::UnrecognizedArgument { .. } => ErrorKind::UnrecognizedArgument,
            ParseError::OptionValueMissing { .. } => ErrorKind::OptionValueMissing,
            ParseError::DuplicateOption { .. } => ErrorKind::DuplicateOption,
            ParseError::BadOptionValueFormat { .. } => ErrorKind::BadOptionValueFormat,
            ParseError::BadParameterValueFormat { .. } => ErrorKind::BadParameterValueFormat,
            ParseError::BadRemainingParameterValueFormat { .. } => {
                ErrorKind::BadRemainingParameterValueFormat
            }
            ParseError::FlagOptionValue { .. } => ErrorKind::FlagOptionValue,
            ParseError::MissingRequiredOption { .. } => ErrorKind::MissingRequiredOption,
            ParseError::MissingRequiredParameter { .. } => ErrorKind::MissingRequiredParameter,
        }
    }
}

/// Render a [`ParseError`] as a single line of text
pub type MessageFn = fn(&ParseError) -> String;

/**
Per-[`ErrorKind`] overrides of the default error messages, built in a `const`
and attached to a model with `#[parley(messages = "path::to::TABLE")]`. Kinds
without an entry fall back to the error's [`Display`][fmt::Display].

```
use parley::errors::{ErrorKind, MessageTable, ParseError};

const MESSAGES: MessageTable = MessageTable::new()
    .with(ErrorKind::UnknownOption, |error| match error {
        ParseError::UnknownOption { option, .. } => format!("what is {option}?"),
        error => error.to_string(),
    });

let error = ParseError::UnknownOption {
    option: "x".to_owned(),
    argument: "-x".to_owned(),
};

assert_eq!(MESSAGES.message(&error), "what is x?");
```
*/
#[derive(Clone, Copy)]
pub struct MessageTable {
    entries: [Option<MessageFn>; ErrorKind::COUNT],
}

impl MessageTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [None; ErrorKind::COUNT],
        }
    }

    /// Use `message` to render errors of this `kind`
    #[must_use]
    pub const fn with(mut self, kind: ErrorKind, message: MessageFn) -> Self {
        self.entries[kind as usize] = Some(message);
        self
    }

    #[must_use]
    pub fn message(&self, error: &ParseError) -> String {
        match self.entries[error.kind() as usize] {
            Some(message) => message(error),
            None => error.to_string(),
        }
    }
}

impl Default for MessageTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(
                self.entries
                    .iter()
                    .zip(ALL_KINDS)
                    .filter(|(entry, _)| entry.is_some())
                    .map(|(_, kind)| kind),
            )
            .finish()
    }
}

const ALL_KINDS: [ErrorKind; ErrorKind::COUNT] = [
    ErrorKind::UnknownOption,
    ErrorKind::UnrecognizedArgument,
    ErrorKind::OptionValueMissing,
    ErrorKind::DuplicateOption,
    ErrorKind::BadOptionValueFormat,
    ErrorKind::BadParameterValueFormat,
    ErrorKind::BadRemainingParameterValueFormat,
    ErrorKind::FlagOptionValue,
    ErrorKind::MissingRequiredOption,
    ErrorKind::MissingRequiredParameter,
];

/**
A non-empty, insertion-ordered set of [`ParseError`]s.

Two collections are equal when they hold the same errors in the same order.
*/
#[derive(Debug, Clone)]
pub struct ParseErrors {
    errors: IndexSet<ParseError>,
}

impl ParseErrors {
    /// Returns `None` if there are no errors
    #[must_use]
    pub fn new(errors: IndexSet<ParseError>) -> Option<Self> {
        match errors.is_empty() {
            true => None,
            false => Some(Self { errors }),
        }
    }

    #[must_use]
    pub fn single(error: ParseError) -> Self {
        Self {
            errors: IndexSet::from([error]),
        }
    }

    /// Collect errors into a set, dropping duplicates. Returns `None` if
    /// there are no errors.
    pub fn collect(errors: impl IntoIterator<Item = ParseError>) -> Option<Self> {
        Self::new(errors.into_iter().collect())
    }

    #[inline]
    pub fn iter(&self) -> indexmap::set::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// Never zero
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The first error that was found
    #[inline]
    #[must_use]
    pub fn first(&self) -> &ParseError {
        &self.errors[0]
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, error: &ParseError) -> bool {
        self.errors.contains(error)
    }

    /// The rendered message for each error, in order, using `table` for
    /// overrides if given.
    pub fn messages<'a>(
        &'a self,
        table: Option<&'a MessageTable>,
    ) -> impl Iterator<Item = String> + 'a {
        self.errors.iter().map(move |error| match table {
            Some(table) => table.message(error),
            None => error.to_string(),
        })
    }
}

impl PartialEq for ParseErrors {
    fn eq(&self, other: &Self) -> bool {
        self.errors.iter().eq(other.errors.iter())
    }
}

impl Eq for ParseErrors {}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = indexmap::set::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = indexmap::set::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// One error per line
impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.errors.iter();

        if let Some(first) = errors.next() {
            write!(f, "{first}")?;
        }

        errors.try_for_each(|error| write!(f, "\n{error}"))
    }
}

impl core::error::Error for ParseErrors {}
