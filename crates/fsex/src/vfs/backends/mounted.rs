//! Mounted host directory backend.
//!
//! Maps a virtual root onto a real directory. Every name is validated with
//! [`valid_path`] before it is joined onto the root, so `..` and absolute
//! names are rejected before the OS is asked anything.

use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fsex_types::{AccessMode, FileInfo, SysInfo};
use tracing::{debug, trace};
use wax::Glob;

use crate::vfs::config::MountOptions;
use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::ops::{File, Fs, GlobFs, ReadDirFile, ReadDirFs, WriteSeekFile};
use crate::vfs::path::{host_join, logical_join, normalize, to_slash, valid_path};
use crate::vfs::types::DirEntry;

/// A filesystem confined to one host directory.
///
/// All operations are relative to `root`. For example, if `root` is
/// `/srv/site`, then `open("static/app.js")` opens `/srv/site/static/app.js`.
///
/// The root is made absolute and normalized at construction and never
/// changes, so one instance can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct MountedDir {
    root: PathBuf,
    mode: AccessMode,
    confine_symlinks: bool,
}

impl MountedDir {
    /// Mount `root` read-only. Fails if it is not an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> VfsResult<Self> {
        Self::with_options(MountOptions::new(root))
    }

    /// Mount `root` read-write. Fails if it is not an existing directory.
    pub fn read_write(root: impl Into<PathBuf>) -> VfsResult<Self> {
        Self::with_options(MountOptions::new(root).read_write())
    }

    /// Mount with explicit options.
    pub fn with_options(opts: MountOptions) -> VfsResult<Self> {
        let root = std::path::absolute(&opts.root)
            .map(|p| normalize(&p))
            .map_err(|e| VfsError::io("mount", &opts.root, e))?;

        if opts.require_dir {
            let meta = fs::metadata(&root).map_err(|e| VfsError::io("mount", &root, e))?;
            if !meta.is_dir() {
                return Err(VfsError::not_a_directory(&root));
            }
        }

        debug!(root = %root.display(), mode = %opts.mode, "mounted host directory");
        Ok(Self {
            root,
            mode: opts.mode,
            confine_symlinks: opts.confine_symlinks,
        })
    }

    /// The absolute root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The access mode files are opened with.
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Validate `name` and join it onto the root.
    ///
    /// The joined path in an `InvalidPath` error is for diagnostics only; it
    /// is never opened.
    fn resolve(&self, op: &'static str, name: &str) -> VfsResult<PathBuf> {
        if !valid_path(name) {
            return Err(VfsError::invalid_path(op, self.root.join(name)));
        }
        let full = host_join(&self.root, name);
        if self.confine_symlinks {
            check_confined(op, &self.root, &full)?;
        }
        Ok(full)
    }

    fn open_host(&self, host: &Path) -> VfsResult<fs::File> {
        let writable = self.mode.is_writable();
        match fs::OpenOptions::new().read(true).write(writable).open(host) {
            Ok(file) => Ok(file),
            // Directories can't be opened for writing but can still be listed.
            Err(e) if writable && e.kind() == io::ErrorKind::IsADirectory => {
                fs::File::open(host).map_err(|e| VfsError::io("open", host, e))
            }
            Err(e) => Err(VfsError::io("open", host, e)),
        }
    }
}

impl Fs for MountedDir {
    #[tracing::instrument(level = "trace", skip(self), name = "mounted.open")]
    fn open(&self, name: &str) -> VfsResult<Box<dyn File>> {
        let host = self.resolve("open", name)?;
        let file = self.open_host(&host)?;
        let is_dir = file
            .metadata()
            .map_err(|e| VfsError::io("open", &host, e))?
            .is_dir();
        Ok(Box::new(MountedFile {
            file: Some(file),
            path: name.to_string(),
            host_path: host,
            mode: self.mode,
            is_dir,
            confine_root: self.confine_symlinks.then(|| self.root.clone()),
            cursor: None,
        }))
    }

    fn as_read_dir_fs(&self) -> Option<&dyn ReadDirFs> {
        Some(self)
    }

    fn as_glob_fs(&self) -> Option<&dyn GlobFs> {
        Some(self)
    }
}

impl ReadDirFs for MountedDir {
    /// Lists the directory named by `name`; `"."` is the root.
    #[tracing::instrument(level = "trace", skip(self), name = "mounted.read_dir")]
    fn read_dir(&self, name: &str) -> VfsResult<Vec<DirEntry>> {
        let host = self.resolve("readdir", name)?;
        fs::read_dir(&host)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotADirectory => VfsError::not_a_directory(&host),
                _ => VfsError::io("readdir", &host, e),
            })?
            .map(|entry| {
                let entry = entry.map_err(|e| VfsError::io("readdir", &host, e))?;
                host_entry(name, &entry)
            })
            .collect()
    }
}

impl GlobFs for MountedDir {
    /// Matches against absolute paths under the root, then strips the root
    /// so results come back relative and `/`-separated.
    #[tracing::instrument(level = "trace", skip(self), name = "mounted.glob")]
    fn glob(&self, pattern: &str) -> VfsResult<Vec<String>> {
        if !valid_pattern(pattern) {
            return Err(VfsError::invalid_path("glob", self.root.join(pattern)));
        }
        let glob = Glob::new(pattern).map_err(|e| VfsError::bad_pattern(pattern, e))?;

        let mut matches = Vec::new();
        for entry in glob.walk(&self.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                    let depth = e.depth();
                    let err = io::Error::from(e);
                    // A missing starting directory just means nothing matches.
                    if depth == 0 && err.kind() == io::ErrorKind::NotFound {
                        break;
                    }
                    return Err(VfsError::io("glob", path, err));
                }
            };
            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| VfsError::path_escapes_root("glob", entry.path()))?;
            if rel.as_os_str().is_empty() {
                continue;
            }
            matches.push(to_slash(rel));
        }
        matches.sort();

        trace!(count = matches.len(), "glob matched");
        Ok(matches)
    }
}

/// Reject paths whose canonical form leaves the canonical `root`.
fn check_confined(op: &'static str, root: &Path, full: &Path) -> VfsResult<()> {
    let canonical = match dunce::canonicalize(full) {
        Ok(p) => p,
        // Missing targets fail on their own when opened.
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(VfsError::io(op, full, e)),
    };
    let canonical_root = dunce::canonicalize(root).map_err(|e| VfsError::io(op, root, e))?;
    if !canonical.starts_with(&canonical_root) {
        return Err(VfsError::path_escapes_root(op, full));
    }
    Ok(())
}

/// Glob patterns are relative and may not climb out of the root.
fn valid_pattern(pattern: &str) -> bool {
    !pattern.is_empty()
        && !pattern.starts_with('/')
        && !pattern.contains('\0')
        && pattern.split('/').all(|elem| elem != "..")
}

/// An open file inside a [`MountedDir`].
///
/// Owns the OS handle exclusively. Reads, writes and seeks go straight to
/// the host file with no buffering.
#[derive(Debug)]
pub struct MountedFile {
    file: Option<fs::File>,
    path: String,
    host_path: PathBuf,
    mode: AccessMode,
    is_dir: bool,
    /// Mount root to re-check against when listing, if symlinks are confined.
    confine_root: Option<PathBuf>,
    cursor: Option<fs::ReadDir>,
}

impl MountedFile {
    /// Absolute host path of this file.
    pub fn host_path(&self) -> &Path {
        &self.host_path
    }
}

/// The live OS handle, or `Closed` once it has been released.
fn handle<'a>(
    file: &'a mut Option<fs::File>,
    host_path: &Path,
    op: &'static str,
) -> VfsResult<&'a mut fs::File> {
    file.as_mut().ok_or_else(|| VfsError::closed(op, host_path))
}

impl File for MountedFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        let file = handle(&mut self.file, &self.host_path, "read")?;
        file.read(buf)
            .map_err(|e| VfsError::io("read", &self.host_path, e))
    }

    fn stat(&self) -> VfsResult<FileInfo> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| VfsError::closed("stat", &self.host_path))?;
        let meta = file
            .metadata()
            .map_err(|e| VfsError::io("stat", &self.host_path, e))?;
        host_info(&self.path, &meta)
    }

    fn close(&mut self) -> VfsResult<()> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                self.cursor = None;
                Ok(())
            }
            None => Err(VfsError::closed("close", &self.host_path)),
        }
    }

    fn as_read_dir(&mut self) -> Option<&mut dyn ReadDirFile> {
        if self.is_dir { Some(self) } else { None }
    }

    fn as_write_seek(&mut self) -> Option<&mut dyn WriteSeekFile> {
        if self.is_dir { None } else { Some(self) }
    }
}

impl WriteSeekFile for MountedFile {
    fn write(&mut self, buf: &[u8]) -> VfsResult<usize> {
        let writable = self.mode.is_writable();
        let file = handle(&mut self.file, &self.host_path, "write")?;
        if !writable {
            return Err(VfsError::unsupported("write", &self.host_path));
        }
        file.write(buf)
            .map_err(|e| VfsError::io("write", &self.host_path, e))
    }

    fn seek(&mut self, pos: SeekFrom) -> VfsResult<u64> {
        let file = handle(&mut self.file, &self.host_path, "seek")?;
        file.seek(pos)
            .map_err(|e| VfsError::io("seek", &self.host_path, e))
    }
}

impl ReadDirFile for MountedFile {
    fn read_dir(&mut self, n: isize) -> VfsResult<Vec<DirEntry>> {
        if self.file.is_none() {
            return Err(VfsError::closed("readdir", &self.host_path));
        }
        if self.cursor.is_none() {
            // The listing reopens by path, so the path may have been swapped.
            if let Some(root) = &self.confine_root {
                check_confined("readdir", root, &self.host_path)?;
            }
            let cursor = fs::read_dir(&self.host_path)
                .map_err(|e| VfsError::io("readdir", &self.host_path, e))?;
            self.cursor = Some(cursor);
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Err(VfsError::closed("readdir", &self.host_path));
        };

        let limit = if n > 0 { n.unsigned_abs() } else { usize::MAX };
        let mut entries = Vec::new();
        while entries.len() < limit {
            let Some(next) = cursor.next() else {
                break;
            };
            let entry = next.map_err(|e| VfsError::io("readdir", &self.host_path, e))?;
            entries.push(host_entry(&self.path, &entry)?);
        }
        Ok(entries)
    }
}

/// Build a [`DirEntry`] for a host listing result under logical `parent`.
fn host_entry(parent: &str, entry: &fs::DirEntry) -> VfsResult<DirEntry> {
    let host = entry.path();
    let meta = entry
        .metadata()
        .map_err(|e| VfsError::io("readdir", &host, e))?;
    let logical = logical_join(parent, &entry.file_name().to_string_lossy());
    Ok(DirEntry::host(host_info(&logical, &meta)?, host))
}

/// Convert host metadata into a [`FileInfo`] for logical path `path`.
pub(crate) fn host_info(path: &str, meta: &fs::Metadata) -> VfsResult<FileInfo> {
    let name = path.rsplit('/').next().unwrap_or(path).to_string();
    let modified = meta.modified().map_err(|e| VfsError::io("stat", path, e))?;
    Ok(FileInfo {
        name,
        path: path.to_string(),
        kind: meta.file_type().into(),
        mode: permission_bits(meta),
        size: meta.len(),
        modified,
        sys: sys_info(meta),
    })
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o666 }
}

#[cfg(unix)]
fn sys_info(meta: &fs::Metadata) -> Option<SysInfo> {
    use std::os::unix::fs::MetadataExt;
    Some(SysInfo {
        uid: Some(meta.uid()),
        gid: Some(meta.gid()),
        nlink: Some(meta.nlink()),
        ino: Some(meta.ino()),
        dev: Some(meta.dev()),
    })
}

#[cfg(not(unix))]
fn sys_info(_meta: &fs::Metadata) -> Option<SysInfo> {
    None
}
