/*!
Special commands: alias-triggered handlers like `--help` and `--version`
that pre-empt normal parsing when they appear as the very first argument.
*/

use core::{fmt, marker::PhantomData};

use crate::Parse;

/**
The behavior of a special command. Handlers are constructed through
[`Default`] when their alias is matched, and report the process exit code.

```
use parley::SpecialCommandHandler;

#[derive(Default)]
struct License;

impl SpecialCommandHandler for License {
    fn handle_command(&self) -> i32 {
        println!("MPL-2.0");
        0
    }
}
```
*/
pub trait SpecialCommandHandler {
    /// Do whatever this command does, and return the process exit code
    fn handle_command(&self) -> i32;

    /// Identifies the handler's type when comparing results. There's no
    /// reason to override this.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Create a boxed handler. The derive stores this function, specialized for
/// each handler type, in the model's command table.
pub fn instantiate<H>() -> Box<dyn SpecialCommandHandler>
where
    H: SpecialCommandHandler + Default + 'static,
{
    Box::new(H::default())
}

/// A special command that was matched by [`Parse::parse`]
pub struct SpecialCommand {
    /// The alias exactly as it appeared on the command line
    pub alias: &'static str,
    pub handler: Box<dyn SpecialCommandHandler>,
}

impl SpecialCommand {
    #[inline]
    pub fn run(&self) -> i32 {
        self.handler.handle_command()
    }

    /// Run the handler, then exit the process with its exit code
    pub fn run_and_exit(self) -> ! {
        let code = self.run();
        tracing::debug!(alias = self.alias, code, "special command finished");
        std::process::exit(code)
    }
}

impl fmt::Debug for SpecialCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecialCommand")
            .field("alias", &self.alias)
            .field("handler", &self.handler.type_name())
            .finish()
    }
}

/// Special commands are equal if the same alias selected the same type of
/// handler.
impl PartialEq for SpecialCommand {
    fn eq(&self, other: &Self) -> bool {
        self.alias == other.alias && self.handler.type_name() == other.handler.type_name()
    }
}

impl Eq for SpecialCommand {}

/// The built-in `--help` command: prints the help screen for `T` to stdout.
pub struct HelpCommand<T> {
    phantom: PhantomData<fn() -> T>,
}

impl<T> HelpCommand<T> {
    pub const ALIAS: &'static str = "--help";
    pub const DESCRIPTION: &'static str = "Show help screen";
}

impl<T> Default for HelpCommand<T> {
    fn default() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<T: Parse> SpecialCommandHandler for HelpCommand<T> {
    fn handle_command(&self) -> i32 {
        print!("{}", T::help_text(None));
        0
    }
}

/// The built-in `--version` command: prints `{name} {version}` to stdout.
pub struct VersionCommand<T> {
    phantom: PhantomData<fn() -> T>,
}

impl<T> VersionCommand<T> {
    pub const ALIAS: &'static str = "--version";
    pub const DESCRIPTION: &'static str = "Show version information";
}

impl<T> Default for VersionCommand<T> {
    fn default() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<T: Parse> SpecialCommandHandler for VersionCommand<T> {
    fn handle_command(&self) -> i32 {
        let info = &T::MODEL.info;
        println!("{} {}", info.name, info.version);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Fails;

    impl SpecialCommandHandler for Fails {
        fn handle_command(&self) -> i32 {
            3
        }
    }

    #[derive(Default)]
    struct AlsoFails;

    impl SpecialCommandHandler for AlsoFails {
        fn handle_command(&self) -> i32 {
            3
        }
    }

    #[test]
    fn instantiated_handlers_run() {
        let command = SpecialCommand {
            alias: "fail",
            handler: instantiate::<Fails>(),
        };

        assert_eq!(command.run(), 3);
    }

    #[test]
    fn equality_uses_alias_and_type() {
        let a = SpecialCommand {
            alias: "fail",
            handler: instantiate::<Fails>(),
        };
        let b = SpecialCommand {
            alias: "fail",
            handler: instantiate::<Fails>(),
        };
        let c = SpecialCommand {
            alias: "fail",
            handler: instantiate::<AlsoFails>(),
        };
        let d = SpecialCommand {
            alias: "-f",
            handler: instantiate::<Fails>(),
        };

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
