//! Access mode for mounted filesystems.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How files opened through a filesystem may be used.
///
/// Serialized and parsed in kebab-case (`read-only`, `read-write`) so it reads
/// naturally in config files.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AccessMode {
    /// Files are opened for reading only; writes fail as unsupported.
    #[default]
    ReadOnly,
    /// Files are opened for reading and writing.
    ReadWrite,
}

impl AccessMode {
    /// Returns true if files may be written.
    pub fn is_writable(&self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}
