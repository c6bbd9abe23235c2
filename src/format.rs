//! Text rendering for sizes and permission bits.

use std::fmt;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Render a byte count the way `ls` prints the SIZE column.
///
/// Values below 1024 are printed as an integer with unit `B`; anything larger
/// is divided by 1024 until it drops below 1024 (or reaches `TB`) and printed
/// with two decimals.
pub fn format_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size_bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// The nine owner/group/other permission bits of a mode.
///
/// `Display` renders them as `rwxrwxrwx` with `-` for missing bits. Setuid,
/// setgid and sticky bits are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionBits(u32);

impl PermissionBits {
    pub fn from_mode(mode: u32) -> Self {
        Self(mode & 0o777)
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PermissionBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const FLAGS: [(u32, char); 9] = [
            (0o400, 'r'),
            (0o200, 'w'),
            (0o100, 'x'),
            (0o040, 'r'),
            (0o020, 'w'),
            (0o010, 'x'),
            (0o004, 'r'),
            (0o002, 'w'),
            (0o001, 'x'),
        ];
        for (mask, ch) in FLAGS {
            let c = if self.0 & mask != 0 { ch } else { '-' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
