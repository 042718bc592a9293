//! In-memory filesystem backend.
//!
//! A read-only snapshot assembled by its owner with [`MemoryFs::insert_file`]
//! and [`MemoryFs::insert_dir`], then shared. It offers directory listing but
//! no glob, and its files expose neither write/seek nor directory reads, so
//! it is the natural counterpart to [`MountedDir`](super::MountedDir) when
//! exercising capability probing.

use std::collections::BTreeMap;
use std::sync::Arc;

use fsex_types::FileInfo;

use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::ops::{File, Fs, ReadDirFs};
use crate::vfs::path::valid_path;
use crate::vfs::types::DirEntry;

const FILE_MODE: u32 = 0o444;
const DIR_MODE: u32 = 0o555;

/// Entry in the memory filesystem.
#[derive(Debug, Clone)]
enum Entry {
    File { data: Arc<[u8]>, info: FileInfo },
    Directory { info: FileInfo },
}

impl Entry {
    fn info(&self) -> &FileInfo {
        match self {
            Entry::File { info, .. } => info,
            Entry::Directory { info } => info,
        }
    }
}

/// In-memory filesystem.
///
/// Keys are logical paths; `"."` is the root and always exists.
#[derive(Debug)]
pub struct MemoryFs {
    entries: BTreeMap<String, Entry>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create an empty filesystem containing only the root.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            ".".to_string(),
            Entry::Directory {
                info: FileInfo::directory(".", DIR_MODE),
            },
        );
        Self { entries }
    }

    /// Add a file, creating missing parent directories.
    ///
    /// Replaces an existing file at the same path.
    pub fn insert_file(&mut self, path: &str, data: impl Into<Vec<u8>>) -> VfsResult<()> {
        Self::check_insert(path)?;
        if let Some(Entry::Directory { .. }) = self.entries.get(path) {
            return Err(VfsError::is_a_directory(path));
        }
        self.ensure_parents(path)?;

        let data: Vec<u8> = data.into();
        let data: Arc<[u8]> = data.into();
        let info = FileInfo::file(path, data.len() as u64, FILE_MODE);
        self.entries
            .insert(path.to_string(), Entry::File { data, info });
        Ok(())
    }

    /// Add a directory, creating missing parents. Existing directories are
    /// left as they are.
    pub fn insert_dir(&mut self, path: &str) -> VfsResult<()> {
        Self::check_insert(path)?;
        self.ensure_parents(path)?;
        self.add_dir(path)
    }

    fn check_insert(path: &str) -> VfsResult<()> {
        if !valid_path(path) || path == "." {
            return Err(VfsError::invalid_path("insert", path));
        }
        Ok(())
    }

    fn ensure_parents(&mut self, path: &str) -> VfsResult<()> {
        let mut end = 0;
        while let Some(idx) = path[end..].find('/') {
            end += idx;
            self.add_dir(&path[..end])?;
            end += 1;
        }
        Ok(())
    }

    fn add_dir(&mut self, path: &str) -> VfsResult<()> {
        match self.entries.get(path) {
            Some(Entry::Directory { .. }) => Ok(()),
            Some(Entry::File { .. }) => Err(VfsError::not_a_directory(path)),
            None => {
                self.entries.insert(
                    path.to_string(),
                    Entry::Directory {
                        info: FileInfo::directory(path, DIR_MODE),
                    },
                );
                Ok(())
            }
        }
    }

    fn lookup(&self, op: &'static str, name: &str) -> VfsResult<&Entry> {
        if !valid_path(name) {
            return Err(VfsError::invalid_path(op, name));
        }
        self.entries
            .get(name)
            .ok_or_else(|| VfsError::not_found(name))
    }
}

/// Logical parent of a non-root path.
fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or(".")
}

impl Fs for MemoryFs {
    fn open(&self, name: &str) -> VfsResult<Box<dyn File>> {
        let entry = self.lookup("open", name)?;
        let data = match entry {
            Entry::File { data, .. } => Some(Arc::clone(data)),
            Entry::Directory { .. } => None,
        };
        Ok(Box::new(MemoryFile {
            info: entry.info().clone(),
            data,
            pos: 0,
            closed: false,
        }))
    }

    fn as_read_dir_fs(&self) -> Option<&dyn ReadDirFs> {
        Some(self)
    }
}

impl ReadDirFs for MemoryFs {
    fn read_dir(&self, name: &str) -> VfsResult<Vec<DirEntry>> {
        match self.lookup("readdir", name)? {
            Entry::Directory { .. } => {}
            Entry::File { .. } => return Err(VfsError::not_a_directory(name)),
        }

        let mut result: Vec<DirEntry> = self
            .entries
            .iter()
            .filter(|(path, _)| path.as_str() != "." && parent_of(path) == name)
            .map(|(_, entry)| DirEntry::detached(entry.info().clone()))
            .collect();
        result.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(result)
    }
}

/// An open file in a [`MemoryFs`]. Read-only; directories can be opened and
/// stat'ed but not read.
#[derive(Debug)]
pub struct MemoryFile {
    info: FileInfo,
    data: Option<Arc<[u8]>>,
    pos: usize,
    closed: bool,
}

impl MemoryFile {
    fn check_open(&self, op: &'static str) -> VfsResult<()> {
        if self.closed {
            Err(VfsError::closed(op, &self.info.path))
        } else {
            Ok(())
        }
    }
}

impl File for MemoryFile {
    fn path(&self) -> &str {
        &self.info.path
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        self.check_open("read")?;
        let Some(data) = &self.data else {
            return Err(VfsError::is_a_directory(&self.info.path));
        };
        let remaining = data.get(self.pos..).unwrap_or_default();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }

    fn stat(&self) -> VfsResult<FileInfo> {
        self.check_open("stat")?;
        Ok(self.info.clone())
    }

    fn close(&mut self) -> VfsResult<()> {
        self.check_open("close")?;
        self.closed = true;
        Ok(())
    }
}
