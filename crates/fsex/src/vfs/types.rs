//! Directory entries and capability flags.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::{Path, PathBuf};

use fsex_types::{FileInfo, FileType};

use super::{VfsError, VfsResult};
use crate::vfs::backends::mounted::host_info;

/// One entry produced by a directory listing.
///
/// Holds the metadata snapshot taken during the listing. Entries that came
/// from a host directory also remember the absolute host path, which
/// [`info`](DirEntry::info) uses to fetch fresh metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    snapshot: FileInfo,
    host_path: Option<PathBuf>,
}

impl DirEntry {
    /// Entry backed by a host file at `host_path`.
    pub fn host(snapshot: FileInfo, host_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot,
            host_path: Some(host_path.into()),
        }
    }

    /// Entry with no host file behind it; [`info`](DirEntry::info) returns
    /// the snapshot.
    pub fn detached(snapshot: FileInfo) -> Self {
        Self {
            snapshot,
            host_path: None,
        }
    }

    /// Base name of the entry.
    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    /// Logical path relative to the filesystem root.
    pub fn path(&self) -> &str {
        &self.snapshot.path
    }

    /// Absolute host path, for host-backed entries.
    pub fn host_path(&self) -> Option<&Path> {
        self.host_path.as_deref()
    }

    /// Entry type as seen during the listing.
    pub fn file_type(&self) -> FileType {
        self.snapshot.kind
    }

    /// Returns true if the entry was a directory during the listing.
    pub fn is_dir(&self) -> bool {
        self.snapshot.is_dir()
    }

    /// The snapshot taken during the listing.
    pub fn metadata(&self) -> &FileInfo {
        &self.snapshot
    }

    /// Current metadata for this entry.
    ///
    /// Host-backed entries are re-stat'ed through their full host path, so the
    /// result does not depend on the process working directory. Symlinks are
    /// not followed, matching the listing. Detached entries return their
    /// snapshot.
    pub fn info(&self) -> VfsResult<FileInfo> {
        match &self.host_path {
            Some(host) => {
                let meta = std::fs::symlink_metadata(host)
                    .map_err(|e| VfsError::io("stat", host, e))?;
                host_info(&self.snapshot.path, &meta)
            }
            None => Ok(self.snapshot.clone()),
        }
    }
}

/// Filesystem-level capability flags.
///
/// Derived from the probe methods on [`Fs`](super::Fs); useful for logging
/// and for deciding up front which code path to take.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capabilities.
    pub const NONE: Self = Self(0);
    /// `open` (always present).
    pub const OPEN: Self = Self(1);
    /// Filesystem-level directory listing.
    pub const READ_DIR: Self = Self(1 << 1);
    /// Glob matching.
    pub const GLOB: Self = Self(1 << 2);

    /// Returns true if every flag in `other` is set.
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::OPEN, "open"),
            (Self::READ_DIR, "read_dir"),
            (Self::GLOB, "glob"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        write!(f, "Capabilities({})", names.join(" | "))
    }
}
