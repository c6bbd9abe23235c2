use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Conventional exit code type used by explorer commands.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// The REPL only uses it for logging; the user sees the printed message.
pub type ExitCode = i32;

/// Object-safe trait for any command that can be executed by the explorer.
///
/// Implemented for every builtin via a blanket impl.
pub trait ExecutableCommand {
    /// Executes the command, writing everything the user should see to `stdout`.
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment)
    -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
