//! VFS error types.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// VFS error type.
///
/// Every variant is built fresh at the failure site with the operation name
/// and path attached, so callers can branch on the variant and still print a
/// useful message.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Path is not a valid relative path (escapes via `..`, is absolute,
    /// or is malformed). Raised before any OS call.
    #[error("{op} {}: invalid path", path.display())]
    InvalidPath { op: &'static str, path: PathBuf },

    /// Path resolves (through symlinks) outside the mount root.
    #[error("{op} {}: path escapes root", path.display())]
    PathEscapesRoot { op: &'static str, path: PathBuf },

    /// Expected a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Expected a file.
    #[error("is a directory: {}", .0.display())]
    IsADirectory(PathBuf),

    /// File or directory not found (non-host backends).
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The backend or handle does not provide this operation.
    #[error("{op} {}: operation not supported", path.display())]
    Unsupported { op: &'static str, path: PathBuf },

    /// The handle has already been closed.
    #[error("{op} {}: file already closed", path.display())]
    Closed { op: &'static str, path: PathBuf },

    /// Glob pattern could not be compiled.
    #[error("bad pattern {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: String },

    /// Host I/O error, passed through with context.
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration could not be parsed.
    #[error("config: {0}")]
    Config(String),
}

impl VfsError {
    /// Create an InvalidPath error.
    pub fn invalid_path(op: &'static str, path: impl AsRef<Path>) -> Self {
        Self::InvalidPath {
            op,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a PathEscapesRoot error.
    pub fn path_escapes_root(op: &'static str, path: impl AsRef<Path>) -> Self {
        Self::PathEscapesRoot {
            op,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl AsRef<Path>) -> Self {
        Self::NotADirectory(path.as_ref().to_path_buf())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl AsRef<Path>) -> Self {
        Self::IsADirectory(path.as_ref().to_path_buf())
    }

    /// Create a NotFound error.
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(path.as_ref().to_path_buf())
    }

    /// Create an Unsupported error.
    pub fn unsupported(op: &'static str, path: impl AsRef<Path>) -> Self {
        Self::Unsupported {
            op,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a Closed error.
    pub fn closed(op: &'static str, path: impl AsRef<Path>) -> Self {
        Self::Closed {
            op,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a BadPattern error.
    pub fn bad_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        Self::BadPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap a host I/O error with the operation and path it came from.
    pub fn io(op: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The underlying `io::ErrorKind`, for host errors only.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            VfsError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Returns true for not-found conditions from any backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound(_)) || self.io_kind() == Some(io::ErrorKind::NotFound)
    }
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        let kind = match &e {
            VfsError::InvalidPath { .. } => io::ErrorKind::InvalidInput,
            VfsError::PathEscapesRoot { .. } => io::ErrorKind::PermissionDenied,
            VfsError::NotADirectory(_) => io::ErrorKind::NotADirectory,
            VfsError::IsADirectory(_) => io::ErrorKind::IsADirectory,
            VfsError::NotFound(_) => io::ErrorKind::NotFound,
            VfsError::Unsupported { .. } => io::ErrorKind::Unsupported,
            VfsError::Closed { .. } => io::ErrorKind::BrokenPipe,
            VfsError::BadPattern { .. } => io::ErrorKind::InvalidInput,
            VfsError::Config(_) => io::ErrorKind::InvalidData,
            VfsError::Io { source, .. } => source.kind(),
        };
        match e {
            VfsError::Io { source, .. } => source,
            other => io::Error::new(kind, other),
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;
