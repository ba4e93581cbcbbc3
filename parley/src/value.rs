/*!
Traits for types that can be decoded from a single command line argument.

For most types it makes sense to implement [`ParsedValue`], which hooks into
an existing [`FromStr`] implementation, or to `#[derive(Value)]` on a
fieldless enum. Implement [`Value`] directly if your type needs custom
decoding rules.
*/

use core::{fmt::Display, str::FromStr};

use crate::model::ScalarKind;

/**
Something went wrong decoding an argument. The parser only cares *that* the
value was rejected, and reports the raw text; the details here are for
callers that use [`Value::from_arg`] directly.
*/
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValueError {
    /// Failed to parse the argument
    #[error("failed to parse {arg:?}: {message}")]
    Parse { arg: String, message: String },

    /// The argument should have been one of these names
    #[error("{arg:?} wasn't one of the possible values: {expected:?}")]
    ShouldBe {
        arg: String,
        expected: &'static [&'static str],
    },

    /// Something else went wrong
    #[error("{0}")]
    Custom(String),
}

impl ValueError {
    pub fn parse(arg: &str, message: impl Display) -> Self {
        Self::Parse {
            arg: arg.to_owned(),
            message: message.to_string(),
        }
    }

    pub fn should_be(arg: &str, expected: &'static [&'static str]) -> Self {
        Self::ShouldBe {
            arg: arg.to_owned(),
            expected,
        }
    }

    pub fn custom(message: impl Display) -> Self {
        Self::Custom(message.to_string())
    }
}

/**
A type that can be decoded from a single command line argument.

The [`KIND`][Value::KIND] is recorded in the model, and decides things like
whether the parser treats the field as a flag.
*/
pub trait Value: Sized {
    const KIND: ScalarKind;

    /// Decode a value from an argument given on the command line
    fn from_arg(arg: &str) -> Result<Self, ValueError>;
}

/**
For types with a [`FromStr`] implementation, [`ParsedValue`] automatically
gives them a [`Value`] implementation so that they can be used as command
line arguments. Override [`KIND`][ParsedValue::KIND] if the type belongs to
one of the well-known categories.
*/
pub trait ParsedValue: FromStr {
    const KIND: ScalarKind = ScalarKind::Parsable;
}

impl<T> Value for T
where
    T: ParsedValue,
    T::Err: Display,
{
    const KIND: ScalarKind = <T as ParsedValue>::KIND;

    #[inline]
    fn from_arg(arg: &str) -> Result<Self, ValueError> {
        arg.parse().map_err(|err| ValueError::parse(arg, err))
    }
}
