//! Helpers that work against any [`Fs`] by probing capabilities.

use fsex_types::FileInfo;

use super::ops::Fs;
use super::types::DirEntry;
use super::{VfsError, VfsResult};

const READ_CHUNK: usize = 8 * 1024;

/// List the named directory.
///
/// Uses [`ReadDirFs`](super::ReadDirFs) when the filesystem has it, otherwise
/// opens `name` and uses [`ReadDirFile`](super::ReadDirFile). Fails with
/// `Unsupported` when neither is available.
pub fn read_dir(fs: &dyn Fs, name: &str) -> VfsResult<Vec<DirEntry>> {
    if let Some(rd) = fs.as_read_dir_fs() {
        return rd.read_dir(name);
    }

    let mut file = fs.open(name)?;
    let listed = match file.as_read_dir() {
        Some(dir) => dir.read_dir(-1),
        None => Err(VfsError::unsupported("readdir", name)),
    };
    let closed = file.close();
    let entries = listed?;
    closed?;
    Ok(entries)
}

/// Match `pattern` if the filesystem supports globbing.
pub fn glob(fs: &dyn Fs, pattern: &str) -> VfsResult<Vec<String>> {
    match fs.as_glob_fs() {
        Some(g) => g.glob(pattern),
        None => Err(VfsError::unsupported("glob", pattern)),
    }
}

/// Read a whole file.
pub fn read_file(fs: &dyn Fs, name: &str) -> VfsResult<Vec<u8>> {
    let mut file = fs.open(name)?;
    let mut data = Vec::new();
    let mut buf = vec![0u8; READ_CHUNK];
    let read = loop {
        match file.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => data.extend_from_slice(&buf[..n]),
            Err(e) => break Err(e),
        }
    };
    let closed = file.close();
    read?;
    closed?;
    Ok(data)
}

/// Metadata for the named file.
pub fn stat(fs: &dyn Fs, name: &str) -> VfsResult<FileInfo> {
    let mut file = fs.open(name)?;
    let info = file.stat();
    let closed = file.close();
    let info = info?;
    closed?;
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{Capabilities, File, MemoryFs, MountedDir};
    use tempfile::TempDir;

    /// Exposes only `open`, hiding the wrapped filesystem's other capabilities.
    #[derive(Debug)]
    struct OpenOnly(MountedDir);

    impl Fs for OpenOnly {
        fn open(&self, name: &str) -> VfsResult<Box<dyn File>> {
            self.0.open(name)
        }
    }

    fn mounted() -> (MountedDir, TempDir) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/x.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("big.bin"), vec![7u8; READ_CHUNK * 2 + 3]).unwrap();
        (MountedDir::new(dir.path()).unwrap(), dir)
    }

    #[test]
    fn test_read_dir_falls_back_to_open_directory() {
        let (mounted, _dir) = mounted();
        let open_only = OpenOnly(mounted);
        assert_eq!(open_only.capabilities(), Capabilities::OPEN);

        let entries = read_dir(&open_only, "sub").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path(), "sub/x.txt");

        assert!(matches!(
            read_dir(&open_only, "big.bin"),
            Err(VfsError::Unsupported { op: "readdir", .. })
        ));
    }

    #[test]
    fn test_glob_requires_capability() {
        let (mounted, _dir) = mounted();
        assert_eq!(glob(&mounted, "sub/*.txt").unwrap(), vec!["sub/x.txt"]);

        let memory = MemoryFs::new();
        assert!(matches!(
            glob(&memory, "*"),
            Err(VfsError::Unsupported { op: "glob", .. })
        ));
    }

    #[test]
    fn test_read_file_and_stat() {
        let (mounted, _dir) = mounted();
        let data = read_file(&mounted, "big.bin").unwrap();
        assert_eq!(data.len(), READ_CHUNK * 2 + 3);
        assert!(data.iter().all(|&b| b == 7));

        let info = stat(&mounted, "sub").unwrap();
        assert!(info.is_dir());
        assert_eq!(info.name, "sub");

        assert!(read_file(&mounted, "missing").unwrap_err().is_not_found());
    }
}
