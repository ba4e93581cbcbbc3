#![no_std]

/*!
Low-level classification of command-line arguments. Takes care of the
distinctions between long options, short option clusters, the `--`
terminator, and positionals. No model or type handling happens here; usually
this is too low level to use directly.
*/

mod cluster;

pub use cluster::{Cluster, Options};

/**
The shape of a single raw argument, as seen outside of the verbatim region
that follows a `--` terminator.

Classification is context-free: whether `--output` takes a value, or whether
`-abc` is three flags or one option with an inline value, is decided later by
whoever knows the model.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'arg> {
    /// A bare `--`. Everything after it is positional.
    Terminator,

    /**
    A `--name` or `--name=value` argument. The `name` is everything between
    the leading `--` and the first `=`; it is empty for malformed arguments
    like `--=value`.
    */
    Long {
        name: &'arg str,
        value: Option<&'arg str>,
    },

    /// A `-abc` short option cluster. Only produced for arguments that
    /// [look like options][looks_like_option].
    Short(&'arg Cluster),

    /// Anything else, including `-`, `-5`, and `-1.5`
    Positional(&'arg str),
}

/**
Classify a single argument.

```
use parley_parser::{Token, classify};

assert_eq!(classify("--"), Token::Terminator);
assert_eq!(classify("--out=a.txt"), Token::Long { name: "out", value: Some("a.txt") });
assert!(matches!(classify("-vo"), Token::Short(cluster) if cluster.as_str() == "vo"));
assert_eq!(classify("-5"), Token::Positional("-5"));
```
*/
pub fn classify(argument: &str) -> Token<'_> {
    match argument.strip_prefix("--") {
        Some("") => Token::Terminator,
        Some(long) => match split_once(long, b'=') {
            Some((name, value)) => Token::Long {
                name,
                value: Some(value),
            },
            None => Token::Long {
                name: long,
                value: None,
            },
        },
        None => match looks_like_option(argument) {
            true => match Cluster::new(&argument[1..]) {
                Some(cluster) => Token::Short(cluster),
                None => Token::Positional(argument),
            },
            false => Token::Positional(argument),
        },
    }
}

/**
Check if an argument looks like an option: it starts with `-`, has more than
one character, and contains at least one letter. Negative numbers like `-5`
and a lone `-` are not options.
*/
#[inline]
#[must_use]
pub fn looks_like_option(argument: &str) -> bool {
    argument.len() > 1
        && argument.starts_with('-')
        && argument[1..].chars().any(|c| c.is_alphabetic())
}

fn split_once(input: &str, delimiter: u8) -> Option<(&str, &str)> {
    // The delimiter is ASCII, so both sides of it are char boundaries
    memchr::memchr(delimiter, input.as_bytes()).map(|i| (&input[..i], &input[i + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_terminator() {
        assert_eq!(classify("--"), Token::Terminator);
    }

    #[test]
    fn long_without_value() {
        assert_eq!(
            classify("--verbose"),
            Token::Long {
                name: "verbose",
                value: None
            }
        );
    }

    #[test]
    fn long_splits_at_first_equals() {
        assert_eq!(
            classify("--define=key=value"),
            Token::Long {
                name: "define",
                value: Some("key=value")
            }
        );
    }

    #[test]
    fn long_with_empty_name() {
        assert_eq!(
            classify("--=value"),
            Token::Long {
                name: "",
                value: Some("value")
            }
        );
    }

    #[test]
    fn long_with_empty_value() {
        assert_eq!(
            classify("--name="),
            Token::Long {
                name: "name",
                value: Some("")
            }
        );
    }

    #[test]
    fn short_cluster() {
        match classify("-abc") {
            Token::Short(cluster) => {
                let options: [(char, &str); 3] = [('a', "bc"), ('b', "c"), ('c', "")];
                assert!(cluster.options().eq(options));
            }
            token => panic!("unexpected token {token:?}"),
        }
    }

    #[test]
    fn short_cluster_with_leading_digit() {
        assert!(matches!(classify("-5a"), Token::Short(cluster) if cluster.as_str() == "5a"));
    }

    #[test]
    fn numbers_are_positional() {
        assert_eq!(classify("-5"), Token::Positional("-5"));
        assert_eq!(classify("-1.25"), Token::Positional("-1.25"));
    }

    #[test]
    fn lone_dash_is_positional() {
        assert_eq!(classify("-"), Token::Positional("-"));
    }

    #[test]
    fn plain_positional() {
        assert_eq!(classify("file.txt"), Token::Positional("file.txt"));
        assert_eq!(classify(""), Token::Positional(""));
    }

    #[test]
    fn non_ascii_short_options() {
        match classify("-éa") {
            Token::Short(cluster) => {
                let options: [(char, &str); 2] = [('é', "a"), ('a', "")];
                assert!(cluster.options().eq(options));
            }
            token => panic!("unexpected token {token:?}"),
        }
    }
}
