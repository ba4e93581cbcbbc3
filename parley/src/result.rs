use crate::{errors::ParseErrors, special::SpecialCommand};

/// The outcome of [`Parse::parse`][crate::Parse::parse]. Exactly one of
/// these is produced for any input.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult<T> {
    /// Parsing succeeded
    Options(T),

    /// Parsing failed; there's at least one error
    Errors(ParseErrors),

    /// The first argument was a special command alias
    SpecialCommand(SpecialCommand),
}

impl<T> ParseResult<T> {
    /// Get the parsed options, if parsing succeeded
    #[inline]
    pub fn options(self) -> Option<T> {
        match self {
            ParseResult::Options(options) => Some(options),
            _ => None,
        }
    }

    #[inline]
    pub fn errors(&self) -> Option<&ParseErrors> {
        match self {
            ParseResult::Errors(errors) => Some(errors),
            _ => None,
        }
    }

    #[inline]
    pub fn special_command(&self) -> Option<&SpecialCommand> {
        match self {
            ParseResult::SpecialCommand(command) => Some(command),
            _ => None,
        }
    }

    /// Convert to a [`Result`], treating special commands as successes.
    pub fn into_result(self) -> Result<Result<T, SpecialCommand>, ParseErrors> {
        match self {
            ParseResult::Options(options) => Ok(Ok(options)),
            ParseResult::SpecialCommand(command) => Ok(Err(command)),
            ParseResult::Errors(errors) => Err(errors),
        }
    }

    pub fn map<U>(self, op: impl FnOnce(T) -> U) -> ParseResult<U> {
        match self {
            ParseResult::Options(options) => ParseResult::Options(op(options)),
            ParseResult::Errors(errors) => ParseResult::Errors(errors),
            ParseResult::SpecialCommand(command) => ParseResult::SpecialCommand(command),
        }
    }
}
