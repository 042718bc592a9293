//! # fsex
//!
//! A small capability-based virtual filesystem.
//!
//! Consumers depend on the [`Fs`] and [`File`] traits rather than on OS file
//! APIs, so a host directory, an in-memory snapshot or any other backend can
//! sit behind the same contract. [`MountedDir`] is the host-backed
//! implementation: it confines every operation to one directory and rejects
//! untrusted names that try to leave it.
//!
//! ```no_run
//! use fsex::{Fs, GlobFs, MountedDir, util};
//!
//! # fn main() -> fsex::VfsResult<()> {
//! let site = MountedDir::new("/srv/site")?;
//! let html = util::read_file(&site, "index.html")?;
//!
//! if let Some(globber) = site.as_glob_fs() {
//!     for css in globber.glob("static/*/*.css")? {
//!         println!("{css}");
//!     }
//! }
//! # let _ = html;
//! # Ok(())
//! # }
//! ```

pub mod vfs;

pub use fsex_types::{AccessMode, FileInfo, FileType, SysInfo};
pub use vfs::{
    util, Capabilities, DirEntry, File, Fs, GlobFs, MemoryFile, MemoryFs, MountOptions,
    MountedDir, MountedFile, ReadDirFile, ReadDirFs, VfsError, VfsResult, WriteSeekFile,
};
