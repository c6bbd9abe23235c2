use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::entry::{list_directory, render_listing};
use crate::env::Environment;
use crate::error::FsError;
use crate::fs_ops;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::io::Write;
use tracing::warn;

/// Built-in commands known to the explorer at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// against the session [`Environment`].
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "ls" or "cd".
    fn name() -> &'static str;

    /// How many argument tokens the command takes. Anything past that is
    /// dropped before parsing.
    fn arity() -> usize;

    /// Executes the command using the provided output stream and environment.
    ///
    /// Errors carry the single line shown to the user as their outermost
    /// context.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                let not_found = e
                    .downcast_ref::<FsError>()
                    .is_some_and(FsError::is_not_found);
                warn!(not_found, "{}: {:#}", T::name(), e);
                writeln!(stdout, "{}", e)?;
                Ok(1)
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> anyhow::Result<i32> {
        writeln!(stdout, "{}", self.output.trim_end())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            // Arguments are names, never flags: `touch -x` or `rm help` act on files.
            let mut argv = vec!["--"];
            argv.extend_from_slice(&args[..args.len().min(T::arity())]);
            Some(match T::from_args(&[name], &argv) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// List the entries of the current directory.
pub struct Ls {}

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn arity() -> usize {
        0
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let entries = list_directory(&env.current_dir).with_context(|| {
            format!(
                "❌ Error: Could not open directory {}",
                env.current_dir.display()
            )
        })?;
        render_listing(&entries, stdout)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current directory.
/// `..` drops the last path component; anything else is appended to the current path.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to, relative to the current directory.
    pub dir: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn arity() -> usize {
        1
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = if self.dir == ".." {
            env.parent_dir()
        } else {
            env.resolve(&self.dir)
        };

        env::set_current_dir(&target)
            .map_err(|source| FsError::NotFound {
                path: target.clone(),
                source,
            })
            .context("❌ Directory not found.")?;
        env.current_dir = env::current_dir().context("❌ Directory not found.")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Create a new directory (mode 0755).
pub struct Mkdir {
    #[argh(positional)]
    /// name of the directory to create.
    pub name: String,
}

impl BuiltinCommand for Mkdir {
    fn name() -> &'static str {
        "mkdir"
    }

    fn arity() -> usize {
        1
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        fs_ops::make_dir(&env.resolve(&self.name)).context("❌ Failed to create directory.")?;
        writeln!(stdout, "✅ Directory created.")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Create a new empty file, truncating an existing one.
pub struct Touch {
    #[argh(positional)]
    /// name of the file to create.
    pub file: String,
}

impl BuiltinCommand for Touch {
    fn name() -> &'static str {
        "touch"
    }

    fn arity() -> usize {
        1
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        fs_ops::touch(&env.resolve(&self.file)).context("❌ Could not create file.")?;
        writeln!(stdout, "✅ File created.")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Delete a file or an empty directory.
pub struct Rm {
    #[argh(positional)]
    /// name of the file to delete.
    pub file: String,
}

impl BuiltinCommand for Rm {
    fn name() -> &'static str {
        "rm"
    }

    fn arity() -> usize {
        1
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        fs_ops::remove_file(&env.resolve(&self.file)).context("❌ Could not delete file.")?;
        writeln!(stdout, "🗑️ File deleted.")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Delete an empty directory.
pub struct Rmdir {
    #[argh(positional)]
    /// name of the directory to delete.
    pub dir: String,
}

impl BuiltinCommand for Rmdir {
    fn name() -> &'static str {
        "rmdir"
    }

    fn arity() -> usize {
        1
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        fs_ops::remove_dir(&env.resolve(&self.dir)).context("❌ Could not remove directory.")?;
        writeln!(stdout, "🗑️ Directory removed.")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Copy a file.
pub struct Cp {
    #[argh(positional)]
    /// file to copy from.
    pub src: String,

    #[argh(positional)]
    /// file to copy to; overwritten if it exists.
    pub dest: String,
}

impl BuiltinCommand for Cp {
    fn name() -> &'static str {
        "cp"
    }

    fn arity() -> usize {
        2
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let src = env.resolve(&self.src);
        let dest = env.resolve(&self.dest);
        fs_ops::copy_file(&src, &dest).context("❌ Copy failed.")?;
        writeln!(stdout, "📋 Copy successful.")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Move or rename a file or directory.
pub struct Mv {
    #[argh(positional)]
    /// entry to move.
    pub src: String,

    #[argh(positional)]
    /// new name or location.
    pub dest: String,
}

impl BuiltinCommand for Mv {
    fn name() -> &'static str {
        "mv"
    }

    fn arity() -> usize {
        2
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let src = env.resolve(&self.src);
        let dest = env.resolve(&self.dest);
        fs_ops::rename(&src, &dest).context("❌ Move failed.")?;
        writeln!(stdout, "📦 Move successful.")?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Search the current directory tree for entries with an exact name.
pub struct Search {
    #[argh(positional)]
    /// name to look for (case-sensitive).
    pub name: String,
}

impl BuiltinCommand for Search {
    fn name() -> &'static str {
        "search"
    }

    fn arity() -> usize {
        1
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        fs_ops::search(&env.current_dir, &self.name, stdout)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Show the rwx permissions of an entry.
pub struct Perm {
    #[argh(positional)]
    /// entry to inspect.
    pub name: String,
}

impl BuiltinCommand for Perm {
    fn name() -> &'static str {
        "perm"
    }

    fn arity() -> usize {
        1
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let path = env.resolve(&self.name);
        let bits = fs_ops::read_permissions(&path)
            .with_context(|| format!("❌ Cannot access: {}", path.display()))?;
        writeln!(stdout, "{}", bits)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the permissions of an entry.
pub struct Chmod {
    #[argh(positional)]
    /// octal mode, e.g. 755.
    pub mode: String,

    #[argh(positional)]
    /// entry to change.
    pub file: String,
}

impl BuiltinCommand for Chmod {
    fn name() -> &'static str {
        "chmod"
    }

    fn arity() -> usize {
        2
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        fs_ops::change_mode(&env.resolve(&self.file), &self.mode)
            .context("❌ Failed to update permissions.")?;
        writeln!(stdout, "✅ Permissions updated.")?;
        Ok(0)
    }
}

const HELP: &str = "
📘 Commands Available:
ls                    - List files in current directory
cd <dir>              - Change directory
mkdir <name>          - Create a new directory
touch <file>          - Create a new empty file
rm <file>             - Delete a file
rmdir <dir>           - Delete a directory
cp <src> <dest>       - Copy file
mv <src> <dest>       - Move/Rename file or folder
search <name>         - Search for a file/folder
perm <name>           - Show permissions
chmod <mode> <file>   - Change permissions (e.g. 755)
help                  - Show help menu
exit                  - Exit File Explorer
";

#[derive(FromArgs)]
/// Print the list of available commands.
pub struct Help {}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn arity() -> usize {
        0
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        write!(stdout, "{}", HELP)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Leave the explorer.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn arity() -> usize {
        0
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}
