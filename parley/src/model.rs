/*!
The normalized, compile-time description of an options model. These tables
are emitted by `#[derive(Parse)]` as a `const`, and are interpreted by
[`machine`][crate::machine] at parse time and by the help renderer.

Every entry that receives a value carries a `store` function: the coercion
routine for that field, resolved when the table was generated. The
interpreter never needs to know the field's concrete type.
*/

use crate::{Tags, errors::MessageTable, special::SpecialCommandHandler, value::ValueError};

/// Decode a raw argument and store it in the per-field storage `S`.
pub type StoreFn<S> = fn(&mut S, &str) -> Result<(), ValueError>;

/// A user-supplied replacement for the entire help screen.
pub type HelpTextFn = fn(Option<&crate::ParseErrors>) -> String;

/// The broad category of a value, which decides how it is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// A boolean flag. Set by presence, never parsed from inline text.
    Flag,

    /// Exactly one character
    Char,

    /// Text that is used as-is
    Text,

    /// A base-10 integer
    Integer { bits: u8, signed: bool },

    /// A floating point number
    Float { bits: u8 },

    /// One of a fixed set of names, matched exactly
    Enum { names: &'static [&'static str] },

    /// Something from the date and time family
    DateTime(DateTimeKind),

    /// A user-defined type with its own parse routine
    Parsable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeKind {
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    DateTimeUtc,
    Duration,
}

/// A [`ScalarKind`], along with how it's wrapped by the field's type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `T`
    Scalar(ScalarKind),

    /// `Option<T>`
    Nullable(ScalarKind),

    /// `Vec<T>` and other collections
    Sequence(ScalarKind),
}

impl ValueKind {
    #[inline]
    #[must_use]
    pub const fn scalar(&self) -> ScalarKind {
        match *self {
            ValueKind::Scalar(kind) | ValueKind::Nullable(kind) | ValueKind::Sequence(kind) => kind,
        }
    }

    /// Flags are set by their presence, and don't consume an argument
    #[inline]
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(self.scalar(), ScalarKind::Flag)
    }

    /// A nullable flag (`Option<bool>`) may be followed by an explicit
    /// `true` or `false` argument.
    #[inline]
    #[must_use]
    pub const fn is_nullable_flag(&self) -> bool {
        matches!(*self, ValueKind::Nullable(ScalarKind::Flag))
    }

    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(*self, ValueKind::Sequence(_))
    }
}

/// A named, non-positional argument
pub struct OptionSpec<S> {
    /// The identifier of the struct field
    pub field: &'static str,
    pub tags: Tags<'static>,
    pub kind: ValueKind,
    pub required: bool,
    pub description: &'static str,
    pub store: StoreFn<S>,
}

/// A positional argument, identified by its index
pub struct ParameterSpec<S> {
    pub index: usize,

    /// The kebab-case name, used only in help and errors
    pub name: &'static str,
    pub kind: ValueKind,
    pub required: bool,
    pub description: &'static str,
    pub store: StoreFn<S>,
}

/// The collector for positional arguments beyond the last indexed parameter.
/// It's always a sequence, and never required.
pub struct RemainingSpec<S> {
    pub name: &'static str,
    pub kind: ValueKind,
    pub description: &'static str,
    pub store: StoreFn<S>,
}

/// An alias-triggered handler that pre-empts normal parsing
#[derive(Clone, Copy)]
pub struct SpecialCommandSpec {
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub handler: fn() -> Box<dyn SpecialCommandHandler>,
}

/// Everything the help screen says that isn't an argument
#[derive(Clone, Copy)]
pub struct ProgramInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub copyright: Option<&'static str>,

    /// If given, replaces the whole rendered help screen
    pub help_text: Option<HelpTextFn>,

    /// If given, overrides the default per-error messages
    pub messages: Option<&'static MessageTable>,
}

/// The complete model of an options type; see the [module docs][self].
pub struct Model<S: 'static> {
    pub info: ProgramInfo,
    pub options: &'static [OptionSpec<S>],

    /// Always sorted by index, with no gaps
    pub parameters: &'static [ParameterSpec<S>],
    pub remaining: Option<RemainingSpec<S>>,
    pub commands: &'static [SpecialCommandSpec],
}

impl<S: 'static> Model<S> {
    /// Find the option with this long name, along with the name as it's
    /// stored in the model
    pub fn find_long(&self, long: &str) -> Option<(usize, &'static str)> {
        self.options.iter().enumerate().find_map(|(index, option)| {
            option
                .tags
                .long()
                .filter(|&candidate| candidate == long)
                .map(|candidate| (index, candidate))
        })
    }

    /// Find the option with this short name
    pub fn find_short(&self, short: char) -> Option<usize> {
        self.options
            .iter()
            .position(|option| option.tags.short() == Some(short))
    }

    /// Find the special command with this exact alias
    pub fn find_command(&self, argument: &str) -> Option<(&'static str, &SpecialCommandSpec)> {
        self.commands.iter().find_map(|command| {
            command
                .aliases
                .iter()
                .find(|&&alias| alias == argument)
                .map(|&alias| (alias, command))
        })
    }
}
