//! Virtual Filesystem abstraction.
//!
//! Key components:
//!
//! - [`Fs`] / [`File`] - Mandatory contracts every backend implements
//! - [`ReadDirFs`], [`GlobFs`], [`ReadDirFile`], [`WriteSeekFile`] - Optional
//!   capabilities, discovered with the `as_*` probe methods
//! - [`MountedDir`] - Host directory access (with path confinement)
//! - [`MemoryFs`] - In-memory snapshot (for substitution and testing)
//!
//! ## Design Decisions
//!
//! - **Probe, don't assume**: optional operations are reached through
//!   `Option`-returning probes, so a minimal backend implements four methods
//!   and nothing else.
//! - **Validate before touching the OS**: names are checked with
//!   [`valid_path`] before they are joined onto a host root.
//! - **Blocking**: every call blocks on the underlying OS call. There is no
//!   buffering, caching or retry anywhere in this layer.

pub mod backends;
mod config;
mod error;
mod ops;
pub mod path;
mod types;
pub mod util;

pub use backends::{MemoryFile, MemoryFs, MountedDir, MountedFile};
pub use config::MountOptions;
pub use error::{VfsError, VfsResult};
pub use ops::{File, Fs, GlobFs, ReadDirFile, ReadDirFs, WriteSeekFile};
pub use path::valid_path;
pub use types::{Capabilities, DirEntry};
