//! An interactive explorer for browsing and changing a directory tree.
//!
//! The explorer reads one command per line (`ls`, `cd`, `mkdir`, `cp`,
//! `search`, `chmod`, ...), resolves every argument against the session's
//! current directory and prints a short result line for each command.
//!
//! The main entry point is [`Interpreter`], which tokenizes input lines and
//! dispatches them to the builtin commands. The filesystem work itself lives
//! in [`fs_ops`] and [`entry`]; those helpers return [`error::FsError`] and
//! can be used without the REPL.

mod builtin;
pub mod command;
pub mod entry;
pub mod env;
pub mod error;
pub mod format;
pub mod fs_ops;
mod interpreter;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, UnknownCommand, tokenize};
