/*!
The interpreter that runs a [`Model`] over a list of arguments.

Parsing is a single pass over the arguments, driven by an explicit [`Expect`]
state. Errors never stop the pass: each one is recorded and the machine moves
on, so that every problem with the command line is reported at once.
*/

use core::fmt;

use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use parley_parser::{Cluster, Token, classify};

use crate::{
    Parse,
    errors::{ParseError, ParseErrors},
    model::Model,
    result::ParseResult,
    special::SpecialCommand,
    util::try_parse_bool,
};

/// An option's name, as it was written on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionName {
    Long(&'static str),
    Short(char),
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OptionName::Long(long) => f.write_str(long),
            OptionName::Short(short) => write!(f, "{short}"),
        }
    }
}

/// What the machine expects the next argument to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Nothing has been read yet; the first argument might be a special
    /// command alias.
    SpecialCommand,

    /// A `--` was seen; everything from here on is positional
    Verbatim,

    /// The previous argument was an unknown option. A following positional
    /// is assumed to be its value, and is ignored.
    Orphan,

    /// Anything: an option or a positional
    Fresh,

    /// A value for the option at `option`. `taken` is set once a sequence
    /// option has at least one value; at that point, running out of values
    /// is no longer an error.
    Value {
        option: usize,
        name: OptionName,
        taken: bool,
    },
}

/// Parse `args` into a `T`. This is the body of [`Parse::parse`].
pub fn run<T, I>(args: I) -> ParseResult<T>
where
    T: Parse,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let model = T::MODEL;
    let mut machine = Machine::new(&model);

    for argument in args {
        if let Some(command) = machine.step(argument.as_ref()) {
            tracing::debug!(alias = command.alias, "special command selected");
            return ParseResult::SpecialCommand(command);
        }
    }

    let result = match machine.finish() {
        Ok(state) => match T::build(state) {
            Ok(options) => ParseResult::Options(options),
            Err(error) => ParseResult::Errors(ParseErrors::single(error)),
        },
        Err(errors) => ParseResult::Errors(errors),
    };

    match result {
        ParseResult::Errors(ref errors) => {
            tracing::debug!(count = errors.len(), "parsing failed");
        }
        _ => tracing::debug!("parsing succeeded"),
    }

    result
}

struct Machine<'m, S: 'static> {
    model: &'m Model<S>,
    state: S,
    expect: Expect,
    seen: FixedBitSet,
    errors: IndexSet<ParseError>,

    /// The next indexed parameter to fill
    next_parameter: usize,

    /// The number of arguments given to the remaining collector so far
    remaining: usize,
}

impl<'m, S: Default + 'static> Machine<'m, S> {
    fn new(model: &'m Model<S>) -> Self {
        Self {
            model,
            state: S::default(),
            expect: Expect::SpecialCommand,
            seen: FixedBitSet::with_capacity(model.options.len()),
            errors: IndexSet::new(),
            next_parameter: 0,
            remaining: 0,
        }
    }

    fn error(&mut self, error: ParseError) {
        tracing::trace!(%error, "recorded error");
        self.errors.insert(error);
    }

    /// Handle a single argument. Returns a special command if this argument
    /// selected one, in which case parsing is over.
    fn step(&mut self, argument: &str) -> Option<SpecialCommand> {
        tracing::trace!(argument, expect = ?self.expect, "step");

        if self.expect == Expect::SpecialCommand {
            self.expect = Expect::Fresh;

            if let Some((alias, command)) = self.model.find_command(argument) {
                return Some(SpecialCommand {
                    alias,
                    handler: (command.handler)(),
                });
            }
        }

        if self.expect == Expect::Verbatim {
            self.positional(argument);
            return None;
        }

        let token = classify(argument);

        if !matches!(token, Token::Positional(_)) {
            self.abandon_pending();
            self.expect = Expect::Fresh;
        }

        match token {
            Token::Terminator => self.expect = Expect::Verbatim,
            Token::Long { name: "", .. } => self.error(ParseError::UnrecognizedArgument {
                argument: argument.to_owned(),
            }),
            Token::Long { name, value } => self.long(argument, name, value),
            Token::Short(cluster) => self.short(argument, cluster),
            Token::Positional(value) => self.positional(value),
        }

        None
    }

    /// An option-like argument arrived while a value was pending
    fn abandon_pending(&mut self) {
        if let Expect::Value {
            option,
            name,
            taken: false,
        } = self.expect
            && !self.model.options[option].kind.is_nullable_flag()
        {
            self.error(ParseError::OptionValueMissing {
                option: name.to_string(),
            });
        }
    }

    fn mark_seen(&mut self, option: usize, name: OptionName) {
        if self.seen.put(option) {
            self.error(ParseError::DuplicateOption {
                option: name.to_string(),
            });
        }
    }

    fn store_option(&mut self, option: usize, name: OptionName, value: &str) {
        let model = self.model;
        let spec = &model.options[option];

        if let Err(err) = (spec.store)(&mut self.state, value) {
            tracing::trace!(%err, field = spec.field, "option value rejected");
            self.error(ParseError::BadOptionValueFormat {
                value: value.to_owned(),
                option: name.to_string(),
            });
        }
    }

    /// A known option appeared without an inline value
    fn begin(&mut self, option: usize, name: OptionName) {
        let kind = self.model.options[option].kind;

        if kind.is_flag() {
            self.store_option(option, name, "true");

            if kind.is_nullable_flag() {
                self.expect = Expect::Value {
                    option,
                    name,
                    taken: false,
                };
            }
        } else {
            self.expect = Expect::Value {
                option,
                name,
                taken: false,
            };
        }
    }

    /// A known option received an inline value, as in `--name=value` or
    /// `-nvalue`
    fn inline(&mut self, option: usize, name: OptionName, value: &str) {
        self.store_option(option, name, value);

        if self.model.options[option].kind.is_sequence() {
            self.expect = Expect::Value {
                option,
                name,
                taken: true,
            };
        }
    }

    fn long(&mut self, argument: &str, name: &str, value: Option<&str>) {
        let Some((option, long)) = self.model.find_long(name) else {
            self.error(ParseError::UnknownOption {
                option: name.to_owned(),
                argument: argument.to_owned(),
            });

            if value.is_none() {
                self.expect = Expect::Orphan;
            }

            return;
        };

        let name = OptionName::Long(long);
        self.mark_seen(option, name);

        match value {
            Some(value) if self.model.options[option].kind.is_flag() => {
                self.error(ParseError::FlagOptionValue {
                    option: name.to_string(),
                    value: value.to_owned(),
                })
            }
            Some(value) => self.inline(option, name, value),
            None => self.begin(option, name),
        }
    }

    fn short(&mut self, argument: &str, cluster: &Cluster) {
        for (short, rest) in cluster.options() {
            self.expect = Expect::Fresh;

            let Some(option) = self.model.find_short(short) else {
                self.error(ParseError::UnknownOption {
                    option: short.to_string(),
                    argument: argument.to_owned(),
                });
                self.expect = Expect::Orphan;
                return;
            };

            let name = OptionName::Short(short);
            self.mark_seen(option, name);

            if self.model.options[option].kind.is_flag() {
                self.begin(option, name);
                continue;
            }

            match rest {
                "" => self.begin(option, name),
                rest => self.inline(option, name, rest),
            }

            return;
        }
    }

    fn positional(&mut self, value: &str) {
        match self.expect {
            Expect::Orphan => {
                tracing::trace!(value, "ignored value of unknown option");
                self.expect = Expect::Fresh;
                return;
            }
            Expect::Value { option, name, .. } => {
                let kind = self.model.options[option].kind;
                self.expect = Expect::Fresh;

                if !kind.is_nullable_flag() {
                    self.store_option(option, name, value);

                    if kind.is_sequence() {
                        self.expect = Expect::Value {
                            option,
                            name,
                            taken: true,
                        };
                    }

                    return;
                }

                if try_parse_bool(value).is_some() {
                    self.store_option(option, name, value);
                    return;
                }
            }
            Expect::SpecialCommand | Expect::Verbatim | Expect::Fresh => {}
        }

        let model = self.model;

        if let Some(parameter) = model.parameters.get(self.next_parameter) {
            self.next_parameter += 1;

            if let Err(err) = (parameter.store)(&mut self.state, value) {
                tracing::trace!(%err, parameter = parameter.name, "parameter value rejected");
                self.error(ParseError::BadParameterValueFormat {
                    value: value.to_owned(),
                    parameter: parameter.name,
                    index: parameter.index,
                });
            }
        } else if let Some(remaining) = &model.remaining {
            let index = self.remaining;
            self.remaining += 1;

            if let Err(err) = (remaining.store)(&mut self.state, value) {
                tracing::trace!(%err, index, "remaining value rejected");
                self.error(ParseError::BadRemainingParameterValueFormat {
                    value: value.to_owned(),
                    index,
                });
            }
        } else {
            self.error(ParseError::UnrecognizedArgument {
                argument: value.to_owned(),
            });
        }
    }

    /// Check for anything missing, and hand back the state if there were no
    /// errors at all.
    fn finish(mut self) -> Result<S, ParseErrors> {
        self.abandon_pending();

        let model = self.model;

        for (index, option) in model.options.iter().enumerate() {
            if option.required && !self.seen.contains(index) {
                self.error(ParseError::MissingRequiredOption { tags: option.tags });
            }
        }

        for parameter in model.parameters.iter().skip(self.next_parameter) {
            if parameter.required {
                self.error(ParseError::MissingRequiredParameter {
                    parameter: parameter.name,
                    index: parameter.index,
                });
            }
        }

        match ParseErrors::new(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        Tags,
        model::{OptionSpec, ParameterSpec, ProgramInfo, RemainingSpec, ScalarKind, ValueKind},
        value::{Value, ValueError},
    };

    #[derive(Debug, Default)]
    struct State {
        verbose: Option<bool>,
        quiet: Option<bool>,
        color: Option<Option<bool>>,
        level: Option<i32>,
        tags: Vec<String>,
        input: Option<String>,
        extra: Vec<i64>,
    }

    fn set<T: Value>(slot: &mut Option<T>, arg: &str) -> Result<(), ValueError> {
        *slot = Some(T::from_arg(arg)?);
        Ok(())
    }

    fn push<T: Value>(items: &mut Vec<T>, arg: &str) -> Result<(), ValueError> {
        items.push(T::from_arg(arg)?);
        Ok(())
    }

    #[derive(Debug, PartialEq)]
    struct Options {
        verbose: bool,
        quiet: bool,
        color: Option<bool>,
        level: i32,
        tags: Vec<String>,
        input: Option<String>,
        extra: Vec<i64>,
    }

    impl Parse for Options {
        type State = State;

        const MODEL: Model<State> = Model {
            info: ProgramInfo {
                name: "machine",
                version: "1.0.0",
                copyright: None,
                help_text: None,
                messages: None,
            },
            options: &[
                OptionSpec {
                    field: "verbose",
                    tags: Tags::LongShort {
                        long: "verbose",
                        short: 'v',
                    },
                    kind: ValueKind::Scalar(ScalarKind::Flag),
                    required: false,
                    description: "",
                    store: |state, arg| set(&mut state.verbose, arg),
                },
                OptionSpec {
                    field: "quiet",
                    tags: Tags::Short { short: 'q' },
                    kind: ValueKind::Scalar(ScalarKind::Flag),
                    required: false,
                    description: "",
                    store: |state, arg| set(&mut state.quiet, arg),
                },
                OptionSpec {
                    field: "color",
                    tags: Tags::Long { long: "color" },
                    kind: ValueKind::Nullable(ScalarKind::Flag),
                    required: false,
                    description: "",
                    store: |state, arg| {
                        state.color = Some(Some(bool::from_arg(arg)?));
                        Ok(())
                    },
                },
                OptionSpec {
                    field: "level",
                    tags: Tags::LongShort {
                        long: "level",
                        short: 'l',
                    },
                    kind: ValueKind::Scalar(ScalarKind::Integer {
                        bits: 32,
                        signed: true,
                    }),
                    required: true,
                    description: "",
                    store: |state, arg| set(&mut state.level, arg),
                },
                OptionSpec {
                    field: "tags",
                    tags: Tags::LongShort {
                        long: "tag",
                        short: 't',
                    },
                    kind: ValueKind::Sequence(ScalarKind::Text),
                    required: false,
                    description: "",
                    store: |state, arg| push(&mut state.tags, arg),
                },
            ],
            parameters: &[ParameterSpec {
                index: 0,
                name: "input",
                kind: ValueKind::Nullable(ScalarKind::Text),
                required: false,
                description: "",
                store: |state, arg| set(&mut state.input, arg),
            }],
            remaining: Some(RemainingSpec {
                name: "extra",
                kind: ValueKind::Sequence(ScalarKind::Integer {
                    bits: 64,
                    signed: true,
                }),
                description: "",
                store: |state, arg| push(&mut state.extra, arg),
            }),
            commands: &[],
        };

        fn build(state: State) -> Result<Self, ParseError> {
            Ok(Self {
                verbose: state.verbose.unwrap_or_default(),
                quiet: state.quiet.unwrap_or_default(),
                color: state.color.unwrap_or_default(),
                level: state.level.ok_or(ParseError::MissingRequiredOption {
                    tags: Tags::LongShort {
                        long: "level",
                        short: 'l',
                    },
                })?,
                tags: state.tags,
                input: state.input,
                extra: state.extra,
            })
        }
    }

    fn parse(args: &[&str]) -> ParseResult<Options> {
        run(args)
    }

    fn errors(args: &[&str]) -> Vec<ParseError> {
        match parse(args) {
            ParseResult::Errors(errors) => errors.into_iter().collect(),
            result => panic!("expected errors, got {result:?}"),
        }
    }

    fn options(args: &[&str]) -> Options {
        match parse(args) {
            ParseResult::Options(options) => options,
            result => panic!("expected options, got {result:?}"),
        }
    }

    #[test]
    fn everything() {
        let parsed = options(&[
            "-v", "--level", "3", "--tag", "a", "b", "--color", "false", "in", "1", "2",
        ]);

        assert_eq!(
            parsed,
            Options {
                verbose: true,
                quiet: false,
                color: Some(false),
                level: 3,
                tags: vec!["a".to_owned(), "b".to_owned()],
                input: Some("in".to_owned()),
                extra: vec![1, 2],
            }
        );
    }

    #[test]
    fn inline_values() {
        let parsed = options(&["--level=-4", "-tx", "y"]);
        assert_eq!(parsed.level, -4);
        assert_eq!(parsed.tags, ["x", "y"]);
    }

    #[test]
    fn clustered_value() {
        let parsed = options(&["-vql7"]);
        assert!(parsed.verbose);
        assert!(parsed.quiet);
        assert_eq!(parsed.level, 7);
    }

    #[test]
    fn negative_numbers_are_values() {
        assert_eq!(options(&["-l", "-5"]).level, -5);
    }

    #[test]
    fn nullable_flag_without_followup() {
        let parsed = options(&["--color", "-l1", "in"]);
        assert_eq!(parsed.color, Some(true));
        assert_eq!(parsed.input.as_deref(), Some("in"));
    }

    #[test]
    fn nullable_flag_followup_ignores_case() {
        assert_eq!(options(&["-l1", "--color", "FALSE"]).color, Some(false));
    }

    #[test]
    fn nullable_flag_rejects_inline() {
        assert_eq!(
            errors(&["-l1", "--color=true"]),
            [ParseError::FlagOptionValue {
                option: "color".to_owned(),
                value: "true".to_owned(),
            }]
        );
    }

    #[test]
    fn missing_value_before_option() {
        assert_eq!(
            errors(&["--level", "-v"]),
            [ParseError::OptionValueMissing {
                option: "level".to_owned()
            }]
        );
    }

    #[test]
    fn dangling_value() {
        assert_eq!(
            errors(&["-l"]),
            [ParseError::OptionValueMissing {
                option: "l".to_owned()
            }]
        );
    }

    #[test]
    fn terminator_while_pending() {
        assert_eq!(
            errors(&["-l1", "--tag", "--", "-x"]),
            [ParseError::OptionValueMissing {
                option: "tag".to_owned()
            }]
        );
    }

    #[test]
    fn terminator_makes_everything_positional() {
        let parsed = options(&["-l1", "--", "-v", "-5"]);
        assert!(!parsed.verbose);
        assert_eq!(parsed.input.as_deref(), Some("-v"));
        assert_eq!(parsed.extra, [-5]);
    }

    #[test]
    fn unknown_long_orphans_its_value() {
        assert_eq!(
            errors(&["-l1", "--nope", "value"]),
            [ParseError::UnknownOption {
                option: "nope".to_owned(),
                argument: "--nope".to_owned(),
            }]
        );
    }

    #[test]
    fn unknown_long_with_inline_value_does_not_orphan() {
        let parsed = parse(&["-l1", "--nope=x", "in"]);
        assert_eq!(
            parsed.errors().map(|errors| errors.len()),
            Some(1),
            "{parsed:?}"
        );
    }

    #[test]
    fn unknown_short_abandons_cluster() {
        assert_eq!(
            errors(&["-l1", "-vxq", "swallowed"]),
            [ParseError::UnknownOption {
                option: "x".to_owned(),
                argument: "-vxq".to_owned(),
            }]
        );
    }

    #[test]
    fn malformed_long() {
        assert_eq!(
            errors(&["-l1", "--=3"]),
            [ParseError::UnrecognizedArgument {
                argument: "--=3".to_owned()
            }]
        );
    }

    #[test]
    fn flags_reject_inline_values() {
        assert_eq!(
            errors(&["-l1", "--verbose=yes"]),
            [ParseError::FlagOptionValue {
                option: "verbose".to_owned(),
                value: "yes".to_owned(),
            }]
        );
    }

    #[test]
    fn repeated_flag_in_cluster() {
        assert_eq!(
            errors(&["-l1", "-vqq"]),
            [ParseError::DuplicateOption {
                option: "q".to_owned()
            }]
        );
    }

    #[test]
    fn bad_values_by_category() {
        assert_eq!(
            errors(&["-l", "x", "in", "1", "two"]),
            [
                ParseError::BadOptionValueFormat {
                    value: "x".to_owned(),
                    option: "l".to_owned(),
                },
                ParseError::BadRemainingParameterValueFormat {
                    value: "two".to_owned(),
                    index: 1,
                },
            ]
        );
    }

    #[test]
    fn identical_errors_are_reported_once() {
        assert_eq!(
            errors(&["-l1", "--nope=1", "--nope=1"]),
            [ParseError::UnknownOption {
                option: "nope".to_owned(),
                argument: "--nope=1".to_owned(),
            }]
        );
    }

    #[test]
    fn missing_required_option() {
        assert_eq!(
            errors(&[]),
            [ParseError::MissingRequiredOption {
                tags: Tags::LongShort {
                    long: "level",
                    short: 'l'
                }
            }]
        );
    }
}
