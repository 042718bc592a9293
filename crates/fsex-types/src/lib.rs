//! Metadata snapshot types for fsex.
//!
//! A pure leaf crate: nothing here performs I/O. Filesystem backends in the
//! `fsex` crate produce these values, and callers can serialize them freely.
//!
//! # Key Types
//!
//! |---------------|------------------------------------------------|
//! | Type          | Purpose                                        |
//! |---------------|------------------------------------------------|
//! | [`FileInfo`]  | Snapshot of one file or directory's attributes |
//! | [`FileType`]  | Regular file, directory, symlink, other        |
//! | [`SysInfo`]   | Backend-specific extras (uid, gid, inode...)   |
//! | [`AccessMode`]| Read-only or read-write open mode              |
//! |---------------|------------------------------------------------|

pub mod info;
pub mod mode;

pub use info::{FileInfo, FileType, SysInfo};
pub use mode::AccessMode;
