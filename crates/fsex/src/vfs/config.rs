//! Mount configuration.
//!
//! [`MountOptions`] describes how a [`MountedDir`](super::MountedDir) is
//! built. It can be assembled in code with the builder methods or loaded from
//! TOML:
//!
//! ```toml
//! root = "/srv/site"
//! mode = "read-write"      # default: "read-only"
//! require_dir = true       # default: true, fail fast if root is not a directory
//! confine_symlinks = true  # default: true, reject symlinks leading out of root
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use fsex_types::AccessMode;

use super::{VfsError, VfsResult};

fn default_true() -> bool {
    true
}

/// Options for mounting a host directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountOptions {
    /// Host directory to mount. Relative paths resolve against the process
    /// working directory at construction time.
    pub root: PathBuf,

    /// Whether opened files may be written.
    #[serde(default)]
    pub mode: AccessMode,

    /// Check at construction that `root` is an existing directory. When false
    /// construction only normalizes the path and errors surface on `open`.
    #[serde(default = "default_true")]
    pub require_dir: bool,

    /// Canonicalize opened paths and reject any that resolve outside the
    /// canonical root (symlinks pointing out of the mount).
    #[serde(default = "default_true")]
    pub confine_symlinks: bool,
}

impl MountOptions {
    /// Strict, read-only, symlink-confined options for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: AccessMode::ReadOnly,
            require_dir: true,
            confine_symlinks: true,
        }
    }

    /// Set the access mode.
    pub fn with_mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    /// Open files for reading and writing.
    pub fn read_write(self) -> Self {
        self.with_mode(AccessMode::ReadWrite)
    }

    /// Skip the construction-time directory check.
    pub fn loose(mut self) -> Self {
        self.require_dir = false;
        self
    }

    /// Set whether symlinks must stay inside the root.
    pub fn with_confine_symlinks(mut self, confine: bool) -> Self {
        self.confine_symlinks = confine;
        self
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(s: &str) -> VfsResult<Self> {
        toml::from_str(s).map_err(|e| VfsError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let opts = MountOptions::new("/srv/site");
        assert_eq!(opts.mode, AccessMode::ReadOnly);
        assert!(opts.require_dir);
        assert!(opts.confine_symlinks);

        let opts = opts.read_write().loose().with_confine_symlinks(false);
        assert_eq!(opts.mode, AccessMode::ReadWrite);
        assert!(!opts.require_dir);
        assert!(!opts.confine_symlinks);
    }

    #[test]
    fn test_from_toml_defaults() {
        let opts = MountOptions::from_toml_str(r#"root = "/srv/site""#).unwrap();
        assert_eq!(opts, MountOptions::new("/srv/site"));
    }

    #[test]
    fn test_from_toml_full() {
        let opts = MountOptions::from_toml_str(
            r#"
            root = "data"
            mode = "read-write"
            require_dir = false
            confine_symlinks = false
            "#,
        )
        .unwrap();
        assert_eq!(opts.root, PathBuf::from("data"));
        assert_eq!(opts.mode, AccessMode::ReadWrite);
        assert!(!opts.require_dir);
        assert!(!opts.confine_symlinks);
    }

    #[test]
    fn test_from_toml_errors() {
        let err = MountOptions::from_toml_str(r#"mode = "read-only""#).unwrap_err();
        assert!(matches!(err, VfsError::Config(_)));

        let err = MountOptions::from_toml_str("root = \"x\"\nmode = \"sometimes\"").unwrap_err();
        assert!(matches!(err, VfsError::Config(_)));
    }
}
