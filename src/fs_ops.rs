//! Filesystem primitives behind the explorer commands.
//!
//! Every helper opens what it needs and drops it before returning, on success
//! and on every error path, so a long session does not accumulate descriptors.

use crate::error::FsError;
use crate::format::PermissionBits;
use std::ffi::OsStr;
use std::fs::{self, DirBuilder, File, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::path::Path;
use tracing::trace;
use walkdir::WalkDir;

/// Mode given to directories created with `mkdir` (before the umask).
pub const DIR_MODE: u32 = 0o755;

/// Copy the bytes of `src` into `dst`, creating or truncating `dst`.
///
/// `dst` is only touched once `src` has been opened. A failure mid-stream
/// leaves whatever was written so far in `dst`. Returns the number of bytes
/// copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, FsError> {
    let mut input = File::open(src).map_err(|source| FsError::Open {
        path: src.to_path_buf(),
        source,
    })?;
    let mut output = File::create(dst).map_err(|source| FsError::Open {
        path: dst.to_path_buf(),
        source,
    })?;
    io::copy(&mut input, &mut output).map_err(|source| FsError::Transfer {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })
}

/// Walk `base` depth-first and write `Found: <path>` for every entry named
/// exactly `target`. Returns how many matches were written.
///
/// Symlinks to directories are followed. A link that leads back to one of its
/// own ancestors is reported if its name matches but is not descended into.
/// Directories that cannot be read are treated as leaves.
pub fn search(base: &Path, target: &str, out: &mut dyn Write) -> io::Result<usize> {
    let target = OsStr::new(target);
    let mut found = 0;

    for entry in WalkDir::new(base).min_depth(1).follow_links(true) {
        let path = match entry {
            Ok(entry) => entry.into_path(),
            Err(err) => {
                trace!("search: {}", err);
                // Loops and dangling links still have a name worth matching;
                // unreadable directories were already yielded as entries.
                let reportable = err.loop_ancestor().is_some()
                    || err
                        .io_error()
                        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
                match err.path() {
                    Some(path) if reportable && err.depth() > 0 => path.to_path_buf(),
                    _ => continue,
                }
            }
        };

        if path.file_name() == Some(target) {
            writeln!(out, "Found: {}", path.display())?;
            found += 1;
        }
    }

    Ok(found)
}

/// Permission bits of `path`, following symlinks.
pub fn read_permissions(path: &Path) -> Result<PermissionBits, FsError> {
    let meta = fs::metadata(path).map_err(|source| FsError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PermissionBits::from_mode(meta.permissions().mode()))
}

/// Parse an octal mode such as `"755"`.
pub fn parse_mode(mode: &str) -> Result<u32, FsError> {
    match u32::from_str_radix(mode, 8) {
        Ok(bits) if bits <= 0o7777 => Ok(bits),
        _ => Err(FsError::Parse {
            mode: mode.to_string(),
        }),
    }
}

/// Apply the octal `mode` string to `path`.
pub fn change_mode(path: &Path, mode: &str) -> Result<u32, FsError> {
    let bits = parse_mode(mode)?;
    fs::set_permissions(path, Permissions::from_mode(bits)).map_err(|source| {
        FsError::ChangeMode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(bits)
}

pub fn make_dir(path: &Path) -> Result<(), FsError> {
    DirBuilder::new()
        .mode(DIR_MODE)
        .create(path)
        .map_err(|source| FsError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Create an empty file, truncating it if it already exists.
pub fn touch(path: &Path) -> Result<(), FsError> {
    File::create(path)
        .map(drop)
        .map_err(|source| FsError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Remove a file, or an empty directory (POSIX `remove` semantics).
pub fn remove_file(path: &Path) -> Result<(), FsError> {
    let removed = match fs::remove_file(path) {
        Err(_) if fs::symlink_metadata(path).is_ok_and(|m| m.is_dir()) => fs::remove_dir(path),
        other => other,
    };
    removed.map_err(|source| FsError::Delete {
        path: path.to_path_buf(),
        source,
    })
}

/// Remove an empty directory.
pub fn remove_dir(path: &Path) -> Result<(), FsError> {
    fs::remove_dir(path).map_err(|source| FsError::Delete {
        path: path.to_path_buf(),
        source,
    })
}

pub fn rename(src: &Path, dst: &Path) -> Result<(), FsError> {
    fs::rename(src, dst).map_err(|source| FsError::Rename {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })
}
