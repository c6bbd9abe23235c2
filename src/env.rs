use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Session state shared by every command of one explorer run.
///
/// - `current_dir`: the directory all command arguments are resolved against.
///   It is only replaced by a successful `cd` and is not re-checked between
///   commands, so it can go stale if the directory is removed underneath us.
/// - `should_exit`: set by `exit`; the REPL stops once it sees it.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Absolute path of the directory the session is "in".
    pub current_dir: PathBuf,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Start a session in the process's working directory.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::at(current_dir)
    }

    /// Start a session in `dir` without touching the process working directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: dir.into(),
            should_exit: false,
        }
    }

    /// `current_dir + "/" + name`, with no normalisation of `.` or `..`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        concat_path(&self.current_dir, OsStr::new(name))
    }

    /// Everything before the last `/` of `current_dir`, or `/` when that
    /// would leave nothing.
    pub fn parent_dir(&self) -> PathBuf {
        let bytes = self.current_dir.as_os_str().as_bytes();
        match bytes.iter().rposition(|&b| b == b'/') {
            Some(0) | None => PathBuf::from("/"),
            Some(idx) => PathBuf::from(OsStr::from_bytes(&bytes[..idx])),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Join `name` onto `base` with a literal `/`.
///
/// Unlike [`Path::join`], an absolute `name` does not replace `base`.
pub fn concat_path(base: &Path, name: &OsStr) -> PathBuf {
    let mut joined = OsString::from(base.as_os_str());
    joined.push("/");
    joined.push(name);
    PathBuf::from(joined)
}
