use crate::command::{CommandFactory, ExitCode};
use crate::env::Environment;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, error};

/// A line holds at most a command and two arguments; the rest is ignored.
const MAX_TOKENS: usize = 3;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate, see `BuiltinCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// No factory recognised the command name.
#[derive(Error, Debug)]
#[error("❓ Unknown command. Type 'help' for options.")]
pub struct UnknownCommand(pub String);

/// Split a line into a command name and up to two arguments.
///
/// Returns `None` for blank lines.
pub fn tokenize(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace().take(MAX_TOKENS);
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}

/// The interactive file explorer.
///
/// The interpreter owns the session [`Environment`] and a list of
/// [`CommandFactory`] objects that are queried to create commands by name.
/// See [`Default`] for the commands included out of the box.
///
/// Example
/// ```
/// use file_explorer::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let code = sh.execute_line("help", &mut out).unwrap();
/// assert_eq!(code, Some(0));
/// assert!(String::from_utf8(out).unwrap().contains("Commands Available"));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self::with_env(Environment::new(), commands)
    }

    pub fn with_env(env: Environment, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { env, commands }
    }

    /// An interpreter with the default commands whose session starts in `env`.
    pub fn starting_in(env: Environment) -> Self {
        Self::with_env(env, default_commands())
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Returns the command's exit code, or [`UnknownCommand`] if no factory
    /// knows `name`. Failures of the command itself are already reported to
    /// `stdout` and show up as a non-zero exit code.
    pub fn run(
        &mut self,
        name: &str,
        args: &[&str],
        stdout: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                return cmd.execute(stdout, &mut self.env);
            }
        }
        Err(UnknownCommand(name.to_string()).into())
    }

    /// Tokenize and run one input line.
    ///
    /// Blank lines yield `Ok(None)`. Unknown commands are reported to `stdout`
    /// and never touch the session state.
    pub fn execute_line(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
    ) -> anyhow::Result<Option<ExitCode>> {
        let Some((name, args)) = tokenize(line) else {
            return Ok(None);
        };
        debug!("dispatching `{}` with {:?}", name, args);

        match self.run(name, &args, stdout) {
            Ok(code) => Ok(Some(code)),
            Err(e) if e.is::<UnknownCommand>() => {
                writeln!(stdout, "{}", e)?;
                Ok(Some(127))
            }
            Err(e) => Err(e),
        }
    }

    /// Read-Eval-Print Loop over the terminal until `exit`, Ctrl-C or Ctrl-D.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = io::stdout();

        println!("\ninput any command ");
        println!("Type 'help' to see available commands.");

        while !self.env.should_exit {
            println!();
            let prompt = format!("[{}]$ ", self.env.current_dir.display());
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    if let Err(err) = self.execute_line(&line, &mut stdout) {
                        error!("failed to write command output: {:#}", err);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        println!("\n👋 Exiting File Explorer.");
        Ok(())
    }
}

fn default_commands() -> Vec<Box<dyn CommandFactory>> {
    use crate::builtin::*;
    vec![
        Box::new(Factory::<Ls>::default()),
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<Mkdir>::default()),
        Box::new(Factory::<Touch>::default()),
        Box::new(Factory::<Rm>::default()),
        Box::new(Factory::<Rmdir>::default()),
        Box::new(Factory::<Cp>::default()),
        Box::new(Factory::<Mv>::default()),
        Box::new(Factory::<Search>::default()),
        Box::new(Factory::<Perm>::default()),
        Box::new(Factory::<Chmod>::default()),
        Box::new(Factory::<Help>::default()),
        Box::new(Factory::<Exit>::default()),
    ]
}

impl Default for Interpreter {
    /// Create an interpreter in the process working directory with every
    /// explorer command: `ls`, `cd`, `mkdir`, `touch`, `rm`, `rmdir`, `cp`,
    /// `mv`, `search`, `perm`, `chmod`, `help` and `exit`.
    fn default() -> Self {
        Self::new(default_commands())
    }
}
