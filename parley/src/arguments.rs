use std::{
    ffi::OsString,
    io::{self, Write as _},
    process,
};

use crate::{Parse, ParseResult};

/// Helper type for loading arguments from the environment. Usually you can
/// just use `#[parley::main]` instead of reaching for this type.
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<String>,
}

impl LoadedArguments {
    /// Load the arguments of this process. Arguments that aren't valid UTF-8
    /// are converted lossily.
    pub fn from_env() -> Self {
        Self::from_os_args(std::env::args_os())
    }

    /// Load arguments from any source. The first argument should be the
    /// program name, as with [`std::env::args_os`].
    pub fn from_os_args(arguments: impl IntoIterator<Item = OsString>) -> Self {
        Self {
            arguments: arguments
                .into_iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
        }
    }

    /// The name of the program, if there was one
    pub fn argv0(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// The arguments, excluding the program name
    pub fn args(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }

    pub fn parse<T: Parse>(&self) -> ParseResult<T> {
        T::parse(self.args())
    }

    /**
    Parse the arguments into a `T`. If parsing fails, print the help screen
    (including the errors) to stderr and exit with code 1. If a special
    command was selected, run it and exit with its code.
    */
    pub fn parse_or_exit<T: Parse>(&self) -> T {
        match self.parse() {
            ParseResult::Options(options) => options,
            ParseResult::SpecialCommand(command) => command.run_and_exit(),
            ParseResult::Errors(errors) => {
                tracing::debug!(count = errors.len(), "exiting after parse errors");

                let help = T::help_text(Some(&errors));
                let _ = io::stderr().lock().write_all(help.as_bytes());
                process::exit(1);
            }
        }
    }
}
