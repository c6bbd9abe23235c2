//! Directory entries, their type tags and the `ls` table.

use crate::env::concat_path;
use crate::error::FsError;
use crate::format::format_size;
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, Metadata};
use std::io::{self, Write};
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use tracing::trace;

/// Kind of a filesystem entry, as shown in the TYPE column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Directory,
    RegularFile,
    Symlink,
    CharDevice,
    BlockDevice,
    Fifo,
    Socket,
    Other,
}

impl TypeTag {
    /// Classify raw `st_mode` bits. Only the file-type field is inspected, so
    /// permission and special bits never change the result.
    pub fn from_mode(mode: u32) -> Self {
        let kind = mode & libc::S_IFMT as u32;
        if kind == libc::S_IFDIR as u32 {
            TypeTag::Directory
        } else if kind == libc::S_IFREG as u32 {
            TypeTag::RegularFile
        } else if kind == libc::S_IFLNK as u32 {
            TypeTag::Symlink
        } else if kind == libc::S_IFCHR as u32 {
            TypeTag::CharDevice
        } else if kind == libc::S_IFBLK as u32 {
            TypeTag::BlockDevice
        } else if kind == libc::S_IFIFO as u32 {
            TypeTag::Fifo
        } else if kind == libc::S_IFSOCK as u32 {
            TypeTag::Socket
        } else {
            TypeTag::Other
        }
    }

    pub fn of(meta: &Metadata) -> Self {
        Self::from_mode(meta.mode())
    }

    /// Four-letter label used in listings.
    pub fn label(self) -> &'static str {
        match self {
            TypeTag::Directory => "DIR",
            TypeTag::RegularFile => "FILE",
            TypeTag::Symlink => "LINK",
            TypeTag::CharDevice => "CHAR",
            TypeTag::BlockDevice => "BLCK",
            TypeTag::Fifo => "FIFO",
            TypeTag::Socket => "SOCK",
            TypeTag::Other => "OTHR",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: TypeTag,
    pub size_bytes: u64,
}

/// Collect the entries of `path`, starting with `.` and `..`.
///
/// Metadata is looked up through `stat` (symlinks are followed). Entries whose
/// metadata cannot be read are left out without an error.
pub fn list_directory(path: &Path) -> Result<Vec<DirectoryEntry>, FsError> {
    let read_dir = fs::read_dir(path).map_err(|source| FsError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let children = read_dir.filter_map(|entry| match entry {
        Ok(entry) => Some(entry.file_name()),
        Err(e) => {
            trace!("skipping unreadable entry in {}: {}", path.display(), e);
            None
        }
    });

    let mut entries = Vec::new();
    for name in [OsString::from("."), OsString::from("..")]
        .into_iter()
        .chain(children)
    {
        let full = concat_path(path, &name);
        match fs::metadata(&full) {
            Ok(meta) => entries.push(DirectoryEntry {
                name: name.to_string_lossy().into_owned(),
                kind: TypeTag::of(&meta),
                size_bytes: meta.len(),
            }),
            Err(e) => trace!("skipping {}: {}", full.display(), e),
        }
    }
    Ok(entries)
}

/// Write the TYPE/SIZE/NAME table for `entries`.
pub fn render_listing(entries: &[DirectoryEntry], out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{:<8}{:<12}NAME", "TYPE", "SIZE")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for entry in entries {
        writeln!(
            out,
            "{:<8}{:<12}{}",
            entry.kind,
            format_size(entry.size_bytes),
            entry.name
        )?;
    }
    Ok(())
}
