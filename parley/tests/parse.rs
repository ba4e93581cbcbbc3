use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeDelta};
use parley::{Parse, ParseError, ParseResult, Tags, Value};

fn options<T: Parse + std::fmt::Debug>(args: &[&str]) -> T {
    match T::parse(args) {
        ParseResult::Options(options) => options,
        result => panic!("expected options, got {result:?}"),
    }
}

fn errors<T: Parse + std::fmt::Debug>(args: &[&str]) -> Vec<ParseError> {
    match T::parse(args) {
        ParseResult::Errors(errors) => errors.into_iter().collect(),
        result => panic!("expected errors, got {result:?}"),
    }
}

#[derive(Value, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Fast,
    ExtraSafe,
}

#[derive(Parse, Debug, PartialEq)]
struct Build {
    /// Print more output
    #[parley(short, long)]
    verbose: bool,

    #[parley(short, long, default = 8)]
    jobs: u32,

    #[parley(long, default)]
    name: String,

    #[parley(long)]
    color: Option<bool>,

    #[parley(short, long)]
    tag: Vec<String>,

    #[parley(long, default = Mode::Fast)]
    mode: Mode,

    #[parley(long)]
    ratio: Option<f64>,

    source: String,
    dest: Option<String>,

    #[parley(remaining)]
    rest: Vec<u32>,
}

#[test]
fn defaults_fill_absent_fields() {
    let build: Build = options(&["src"]);

    assert_eq!(
        build,
        Build {
            verbose: false,
            jobs: 8,
            name: String::new(),
            color: None,
            tag: Vec::new(),
            mode: Mode::Fast,
            ratio: None,
            source: "src".to_owned(),
            dest: None,
            rest: Vec::new(),
        }
    );
}

#[test]
fn explicit_values() {
    let build: Build = options(&[
        "-v",
        "--jobs",
        "2",
        "--name=release",
        "--color",
        "false",
        "--mode",
        "extra-safe",
        "--ratio",
        "1,234.5",
        "src",
        "dst",
        "1",
        "2",
        "-tx",
    ]);

    assert_eq!(
        build,
        Build {
            verbose: true,
            jobs: 2,
            name: "release".to_owned(),
            color: Some(false),
            tag: vec!["x".to_owned()],
            mode: Mode::ExtraSafe,
            ratio: Some(1234.5),
            source: "src".to_owned(),
            dest: Some("dst".to_owned()),
            rest: vec![1, 2],
        }
    );
}

#[test]
fn reparsing_is_idempotent() {
    let args = ["-v", "--jobs", "x", "src", "--bogus"];
    assert_eq!(Build::parse(args), Build::parse(args));

    let args = ["-v", "-j3", "src"];
    assert_eq!(Build::parse(args), Build::parse(args));
}

#[test]
fn sequences_accumulate() {
    let build: Build = options(&["--tag", "a", "b", "-v", "src"]);

    assert_eq!(build.tag, ["a", "b"]);
    assert_eq!(build.source, "src");
}

#[test]
fn nullable_flags() {
    let build: Build = options(&["--color", "src"]);
    assert_eq!(build.color, Some(true));
    assert_eq!(build.source, "src");

    let build: Build = options(&["--color", "TRUE", "src"]);
    assert_eq!(build.color, Some(true));

    let build: Build = options(&["src", "--color"]);
    assert_eq!(build.color, Some(true));
}

#[test]
fn flags_reject_inline_values() {
    assert_eq!(
        errors::<Build>(&["--verbose=yes", "src"]),
        [ParseError::FlagOptionValue {
            option: "verbose".to_owned(),
            value: "yes".to_owned(),
        }]
    );

    assert_eq!(
        errors::<Build>(&["--color=false", "src"]),
        [ParseError::FlagOptionValue {
            option: "color".to_owned(),
            value: "false".to_owned(),
        }]
    );
}

#[test]
fn clustered_values() {
    let build: Build = options(&["-vj12", "src"]);

    assert!(build.verbose);
    assert_eq!(build.jobs, 12);
}

#[test]
fn enum_values_are_case_sensitive() {
    assert_eq!(
        errors::<Build>(&["--mode", "Fast", "src"]),
        [ParseError::BadOptionValueFormat {
            value: "Fast".to_owned(),
            option: "mode".to_owned(),
        }]
    );
}

#[test]
fn bad_remaining_value() {
    assert_eq!(
        errors::<Build>(&["src", "dst", "1", "two"]),
        [ParseError::BadRemainingParameterValueFormat {
            value: "two".to_owned(),
            index: 1,
        }]
    );
}

#[test]
fn unknown_long_without_value_swallows_the_next_argument() {
    assert_eq!(
        errors::<Build>(&["--bogus", "value"]),
        [
            ParseError::UnknownOption {
                option: "bogus".to_owned(),
                argument: "--bogus".to_owned(),
            },
            ParseError::MissingRequiredParameter {
                parameter: "source",
                index: 0,
            },
        ]
    );
}

#[test]
fn unknown_long_with_value_does_not_swallow() {
    assert_eq!(
        errors::<Build>(&["--bogus=1", "src"]),
        [ParseError::UnknownOption {
            option: "bogus".to_owned(),
            argument: "--bogus=1".to_owned(),
        }]
    );
}

#[test]
fn unknown_short_abandons_the_cluster() {
    assert_eq!(
        errors::<Build>(&["-vzj", "4", "src"]),
        [ParseError::UnknownOption {
            option: "z".to_owned(),
            argument: "-vzj".to_owned(),
        }]
    );
}

#[test]
fn identical_errors_are_reported_once() {
    assert_eq!(
        errors::<Build>(&["--bogus=1", "--bogus=1", "src"]),
        [ParseError::UnknownOption {
            option: "bogus".to_owned(),
            argument: "--bogus=1".to_owned(),
        }]
    );
}

#[test]
fn malformed_long() {
    assert_eq!(
        errors::<Build>(&["--=x", "src"]),
        [ParseError::UnrecognizedArgument {
            argument: "--=x".to_owned(),
        }]
    );
}

#[test]
fn negative_numbers_are_positional() {
    #[derive(Parse, Debug)]
    struct Offset {
        #[parley(short, long)]
        verbose: bool,
        offset: i64,
    }

    let offset: Offset = options(&["-12"]);
    assert_eq!(offset.offset, -12);
    assert!(!offset.verbose);
}

#[test]
fn terminator_makes_everything_positional() {
    #[derive(Parse, Debug)]
    struct Verbatim {
        #[parley(short)]
        output: Option<String>,
        value: Option<String>,
    }

    let verbatim: Verbatim = options(&["--", "-oval"]);
    assert_eq!(verbatim.value.as_deref(), Some("-oval"));
    assert_eq!(verbatim.output, None);
}

#[test]
fn terminator_while_value_pending() {
    #[derive(Parse, Debug)]
    struct Verbatim {
        #[parley(short)]
        output: Option<String>,
        value: Option<String>,
    }

    assert_eq!(
        errors::<Verbatim>(&["-o", "--", "x"]),
        [ParseError::OptionValueMissing {
            option: "o".to_owned(),
        }]
    );
}

#[derive(Parse, Debug, PartialEq)]
struct Flags {
    #[parley(short)]
    a: bool,
    #[parley(short)]
    b: bool,
    #[parley(short)]
    c: bool,
}

#[test]
fn cluster_order_is_irrelevant() {
    let expected = Flags {
        a: true,
        b: true,
        c: true,
    };

    assert_eq!(options::<Flags>(&["-abc"]), expected);
    assert_eq!(options::<Flags>(&["-a", "-b", "-c"]), expected);
    assert_eq!(options::<Flags>(&["-ca", "-b"]), expected);
}

#[test]
fn repeated_flag_in_cluster() {
    assert_eq!(
        errors::<Flags>(&["-abb"]),
        [ParseError::DuplicateOption {
            option: "b".to_owned(),
        }]
    );
}

#[test]
fn duplicate_options_in_argument_order() {
    #[derive(Parse, Debug)]
    struct Duplicates {
        #[parley(short = 'a', long = "option-a")]
        option_a: Option<String>,
    }

    assert_eq!(
        errors::<Duplicates>(&["-a", "a", "--option-a", "b", "-a", "c"]),
        [
            ParseError::DuplicateOption {
                option: "option-a".to_owned(),
            },
            ParseError::DuplicateOption {
                option: "a".to_owned(),
            },
        ]
    );
}

#[test]
fn integer_overflow_is_an_error() {
    #[derive(Parse, Debug)]
    struct Number {
        value: i32,
    }

    assert_eq!(
        errors::<Number>(&["2147483648"]),
        [ParseError::BadParameterValueFormat {
            value: "2147483648".to_owned(),
            parameter: "value",
            index: 0,
        }]
    );

    assert_eq!(options::<Number>(&["2147483647"]).value, i32::MAX);
}

#[test]
fn every_missing_item_is_reported() {
    #[derive(Parse, Debug)]
    struct Required {
        #[parley(short, long)]
        level: i32,

        #[parley(long, required)]
        name: Option<String>,

        #[parley(long)]
        optional: Option<String>,

        input: String,
        output: String,
    }

    assert_eq!(
        errors::<Required>(&[]),
        [
            ParseError::MissingRequiredOption {
                tags: Tags::LongShort {
                    long: "level",
                    short: 'l',
                },
            },
            ParseError::MissingRequiredOption {
                tags: Tags::Long { long: "name" },
            },
            ParseError::MissingRequiredParameter {
                parameter: "input",
                index: 0,
            },
            ParseError::MissingRequiredParameter {
                parameter: "output",
                index: 1,
            },
        ]
    );

    let required: Required = options(&["-l", "3", "--name", "n", "in", "out"]);
    assert_eq!(required.name.as_deref(), Some("n"));
}

#[test]
fn explicit_indexes() {
    #[derive(Parse, Debug)]
    struct Transfer {
        #[parley(index = 1)]
        dest: String,

        #[parley(index = 0, name = "from")]
        source: String,
    }

    let copy: Transfer = options(&["a", "b"]);
    assert_eq!(copy.source, "a");
    assert_eq!(copy.dest, "b");

    assert_eq!(
        errors::<Transfer>(&[]),
        [
            ParseError::MissingRequiredParameter {
                parameter: "from",
                index: 0,
            },
            ParseError::MissingRequiredParameter {
                parameter: "dest",
                index: 1,
            },
        ]
    );
}

#[test]
fn too_many_positionals() {
    #[derive(Parse, Debug)]
    struct One {
        value: String,
    }

    assert_eq!(
        errors::<One>(&["a", "b"]),
        [ParseError::UnrecognizedArgument {
            argument: "b".to_owned(),
        }]
    );
}

#[test]
fn short_only_options() {
    #[derive(Parse, Debug)]
    struct Short {
        #[parley(short = 'n', no_long)]
        count: u8,
    }

    assert_eq!(options::<Short>(&["-n5"]).count, 5);
    assert_eq!(
        errors::<Short>(&["--count", "5"]),
        [
            ParseError::UnknownOption {
                option: "count".to_owned(),
                argument: "--count".to_owned(),
            },
            ParseError::MissingRequiredOption {
                tags: Tags::Short { short: 'n' },
            },
        ]
    );
}

#[test]
fn other_collections_and_value_types() {
    #[derive(Parse, Debug)]
    struct Schedule {
        #[parley(long)]
        day: BTreeSet<NaiveDate>,

        #[parley(long)]
        every: Option<TimeDelta>,

        #[parley(long)]
        initial: Option<char>,
    }

    let schedule: Schedule = options(&[
        "--day",
        "2026-03-01",
        "2026-01-01",
        "--every=1.02:00:00",
        "--initial",
        "x",
    ]);

    assert_eq!(
        schedule.day.into_iter().collect::<Vec<_>>(),
        [
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        ]
    );
    assert_eq!(schedule.every, Some(TimeDelta::hours(26)));
    assert_eq!(schedule.initial, Some('x'));

    assert_eq!(
        errors::<Schedule>(&["--initial", "xy"]),
        [ParseError::BadOptionValueFormat {
            value: "xy".to_owned(),
            option: "initial".to_owned(),
        }]
    );
}

#[test]
fn raw_identifier_fields() {
    #[derive(Parse, Debug)]
    struct Raw {
        #[parley(long)]
        r#type: String,
    }

    assert_eq!(options::<Raw>(&["--type", "t"]).r#type, "t");
}

#[test]
fn newtype_values() {
    #[derive(Value, Debug, PartialEq)]
    struct Port(u16);

    #[derive(Parse, Debug)]
    struct Server {
        #[parley(short, long)]
        port: Port,
    }

    assert_eq!(options::<Server>(&["-p", "8080"]).port, Port(8080));
    assert_eq!(
        errors::<Server>(&["-p", "80000"]),
        [ParseError::BadOptionValueFormat {
            value: "80000".to_owned(),
            option: "p".to_owned(),
        }]
    );
}
