//! VFS backends.
//!
//! Backends implement [`Fs`](super::Fs) and whichever optional capabilities
//! they can honor.

mod memory;
pub(crate) mod mounted;

pub use memory::{MemoryFile, MemoryFs};
pub use mounted::{MountedDir, MountedFile};
