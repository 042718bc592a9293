//! Filesystem capability traits.
//!
//! [`Fs`] and [`File`] are the mandatory contracts. Everything else is an
//! optional capability that a backend or handle may expose:
//!
//! | Capability        | Level      | Probe                   |
//! |-------------------|------------|-------------------------|
//! | [`ReadDirFs`]     | filesystem | [`Fs::as_read_dir_fs`]  |
//! | [`GlobFs`]        | filesystem | [`Fs::as_glob_fs`]      |
//! | [`ReadDirFile`]   | file       | [`File::as_read_dir`]   |
//! | [`WriteSeekFile`] | file       | [`File::as_write_seek`] |
//!
//! Probes default to `None`, so a minimal read-only, non-listable backend
//! only has to implement `open`, `read`, `stat` and `close`. Callers must
//! probe before using an optional operation.

use std::fmt;
use std::io::SeekFrom;

use fsex_types::FileInfo;

use super::types::{Capabilities, DirEntry};
use super::VfsResult;

/// An open file handle.
///
/// Handles are exclusively owned by whoever opened them. Once [`close`]
/// succeeds every further call fails with [`VfsError::Closed`].
///
/// [`close`]: File::close
/// [`VfsError::Closed`]: super::VfsError::Closed
pub trait File: Send + fmt::Debug {
    /// Logical path this handle was opened with.
    fn path(&self) -> &str;

    /// Read into `buf`, returning the number of bytes read.
    ///
    /// `Ok(0)` with a non-empty buffer means end of data; errors are always
    /// `Err`.
    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize>;

    /// Fresh metadata for this file. Never cached.
    fn stat(&self) -> VfsResult<FileInfo>;

    /// Release the handle. A second call fails without side effects.
    fn close(&mut self) -> VfsResult<()>;

    /// Directory listing capability, if this handle has it.
    fn as_read_dir(&mut self) -> Option<&mut dyn ReadDirFile> {
        None
    }

    /// Write and seek capability, if this handle has it.
    fn as_write_seek(&mut self) -> Option<&mut dyn WriteSeekFile> {
        None
    }
}

/// A file that can be written and repositioned.
///
/// Read-only implementations either leave [`File::as_write_seek`] returning
/// `None`, or fail [`write`](WriteSeekFile::write) with
/// [`VfsError::Unsupported`](super::VfsError::Unsupported) without touching
/// the file.
pub trait WriteSeekFile: File {
    /// Write `buf`, returning the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> VfsResult<usize>;

    /// Move the file cursor, returning the new offset from the start.
    fn seek(&mut self, pos: SeekFrom) -> VfsResult<u64>;
}

/// An open directory that can list its entries.
pub trait ReadDirFile: File {
    /// Read directory entries.
    ///
    /// With `n <= 0` returns every remaining entry. With `n > 0` returns at
    /// most `n`, and the next call continues where this one stopped. Once
    /// the listing is exhausted an empty vector is returned. Order is
    /// whatever the host yields.
    fn read_dir(&mut self, n: isize) -> VfsResult<Vec<DirEntry>>;
}

/// A filesystem.
///
/// Names are logical, `/`-separated paths relative to the filesystem root
/// (see [`valid_path`](super::path::valid_path)).
pub trait Fs: Send + Sync + fmt::Debug {
    /// Open the named file or directory.
    fn open(&self, name: &str) -> VfsResult<Box<dyn File>>;

    /// Directory listing capability, if this filesystem has it.
    fn as_read_dir_fs(&self) -> Option<&dyn ReadDirFs> {
        None
    }

    /// Glob capability, if this filesystem has it.
    fn as_glob_fs(&self) -> Option<&dyn GlobFs> {
        None
    }

    /// Summary of the filesystem-level capabilities.
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::OPEN;
        if self.as_read_dir_fs().is_some() {
            caps |= Capabilities::READ_DIR;
        }
        if self.as_glob_fs().is_some() {
            caps |= Capabilities::GLOB;
        }
        caps
    }
}

/// A filesystem that can list directories without opening them.
pub trait ReadDirFs: Fs {
    /// List the named directory. Order is not guaranteed.
    fn read_dir(&self, name: &str) -> VfsResult<Vec<DirEntry>>;
}

/// A filesystem that can match glob patterns.
pub trait GlobFs: Fs {
    /// Return every root-relative path matching `pattern`.
    ///
    /// Either the full match set or an error, never a partial result.
    fn glob(&self, pattern: &str) -> VfsResult<Vec<String>>;
}
