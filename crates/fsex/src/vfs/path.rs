//! Path validation and normalization.
//!
//! Names handed to a filesystem are untrusted. They are logical,
//! `/`-separated and relative to the filesystem root; [`valid_path`] decides
//! whether one may be joined onto a host root at all.

use std::path::{Component, Path, PathBuf};

/// Reports whether `name` is a safe relative path.
///
/// `"."` names the root. Anything else must be an unrooted sequence of
/// `/`-separated elements where no element is empty, `.` or `..`.
/// Backslashes and NUL bytes are rejected so a name means the same thing on
/// every host.
pub fn valid_path(name: &str) -> bool {
    if name == "." {
        return true;
    }
    if name.is_empty() || name.contains(['\\', '\0']) {
        return false;
    }
    name.split('/')
        .all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}

/// Lexically clean a path: drop `.` components and resolve `..` by popping.
///
/// Never pops past the root of an absolute path. Does not touch the
/// filesystem, so symlinks are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(p) => result.push(p.as_os_str()),
            Component::RootDir => result.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if result.file_name().is_some() {
                    result.pop();
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            Component::Normal(s) => result.push(s),
        }
    }
    result
}

/// Render a relative host path as a logical `/`-separated string.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a validated logical name onto a host root.
///
/// `"."` maps to the root itself.
pub(crate) fn host_join(root: &Path, name: &str) -> PathBuf {
    if name == "." {
        root.to_path_buf()
    } else {
        name.split('/').fold(root.to_path_buf(), |acc, elem| acc.join(elem))
    }
}

/// Join a logical parent and child name, treating `"."` as the root.
pub(crate) fn logical_join(parent: &str, child: &str) -> String {
    if parent == "." || parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}/{child}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        for name in [".", "a.txt", "static/css/default.css", "x/y", "..hidden", "a..b"] {
            assert!(valid_path(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_paths() {
        for name in [
            "",
            "/etc/passwd",
            "../secret",
            "a/../../b",
            "a/..",
            "./a",
            "a/./b",
            "a//b",
            "a/",
            "a\\b",
            "..\\secret",
            "a\0b",
        ] {
            assert!(!valid_path(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("a/b/../../..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("/tmp/x/")), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_to_slash() {
        let rel: PathBuf = ["static", "js", "default.js"].iter().collect();
        assert_eq!(to_slash(&rel), "static/js/default.js");
        assert_eq!(to_slash(Path::new("")), "");
    }

    #[test]
    fn test_joins() {
        let root = Path::new("/srv/root");
        assert_eq!(host_join(root, "."), PathBuf::from("/srv/root"));
        assert_eq!(host_join(root, "a/b"), PathBuf::from("/srv/root/a/b"));
        assert_eq!(logical_join(".", "a"), "a");
        assert_eq!(logical_join("a", "b"), "a/b");
    }
}
