//! File metadata snapshots.
//!
//! A [`FileInfo`] is taken at the moment of a stat or listing call and never
//! refreshed. Ask the filesystem again for current values.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Anything else the host reports (sockets, fifos, devices).
    Other,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }

    /// Returns true if this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        matches!(self, FileType::Symlink)
    }
}

impl From<std::fs::FileType> for FileType {
    fn from(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            FileType::Directory
        } else if ft.is_file() {
            FileType::File
        } else if ft.is_symlink() {
            FileType::Symlink
        } else {
            FileType::Other
        }
    }
}

/// Host-specific attributes that do not fit the portable fields.
///
/// Only populated by backends that have them (the mounted host directory on
/// unix). Everything is optional so other platforms can fill what they know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysInfo {
    /// Owning user ID.
    pub uid: Option<u32>,
    /// Owning group ID.
    pub gid: Option<u32>,
    /// Number of hard links.
    pub nlink: Option<u64>,
    /// Inode number.
    pub ino: Option<u64>,
    /// Device ID.
    pub dev: Option<u64>,
}

/// Metadata snapshot for one file or directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Base name only.
    pub name: String,
    /// Logical path relative to the filesystem root, `/`-separated.
    /// Used to re-stat or recurse.
    pub path: String,
    /// File type.
    pub kind: FileType,
    /// Permission bits (e.g. 0o644).
    pub mode: u32,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Backend-specific extras.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<SysInfo>,
}

impl FileInfo {
    /// Create a snapshot for a regular file.
    pub fn file(path: impl Into<String>, size: u64, mode: u32) -> Self {
        Self::new(path, FileType::File, size, mode)
    }

    /// Create a snapshot for a directory.
    pub fn directory(path: impl Into<String>, mode: u32) -> Self {
        Self::new(path, FileType::Directory, 0, mode)
    }

    fn new(path: impl Into<String>, kind: FileType, size: u64, mode: u32) -> Self {
        let path = path.into();
        Self {
            name: base_name(&path).to_string(),
            path,
            kind,
            mode,
            size,
            modified: SystemTime::now(),
            sys: None,
        }
    }

    /// Set the modification time.
    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = modified;
        self
    }

    /// Attach host-specific attributes.
    pub fn with_sys(mut self, sys: SysInfo) -> Self {
        self.sys = Some(sys);
        self
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }
}

/// Last `/`-separated element of a logical path. `"."` and `""` stay as is.
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
