use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures produced by the filesystem helpers in [`crate::fs_ops`] and
/// [`crate::entry`].
///
/// Every variant keeps the path(s) involved and, where one exists, the
/// underlying [`io::Error`]. Builtins turn these into a single user-facing
/// line; the full chain only goes to the log.
#[derive(Error, Debug)]
pub enum FsError {
    /// A directory or file could not be opened.
    #[error("cannot open `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target of a lookup does not exist or cannot be reached.
    #[error("cannot access `{}`", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create `{}`", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot delete `{}`", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot rename `{}` to `{}`", src.display(), dst.display())]
    Rename {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The mode string is not an octal number in `0..=7777`.
    #[error("invalid octal mode `{mode}`")]
    Parse { mode: String },

    #[error("cannot change mode of `{}`", path.display())]
    ChangeMode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copying stopped after both ends were opened.
    #[error("copy from `{}` to `{}` failed", src.display(), dst.display())]
    Transfer {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Whether this failure means "the thing is not there" rather than a
    /// generic failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            FsError::NotFound { .. } => true,
            FsError::Open { source, .. }
            | FsError::Create { source, .. }
            | FsError::Delete { source, .. }
            | FsError::Rename { source, .. }
            | FsError::ChangeMode { source, .. }
            | FsError::Transfer { source, .. } => source.kind() == io::ErrorKind::NotFound,
            FsError::Parse { .. } => false,
        }
    }
}
