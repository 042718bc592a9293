//! End-to-end tests for the mounted-directory filesystem.
//!
//! Builds a small site tree in a temp dir, mounts it, and walks through the
//! public contract the way a consumer would: probing capabilities, opening,
//! listing and globbing.

use std::fs;
use std::io::SeekFrom;
use std::path::Path;

use fsex::{
    Capabilities, File, Fs, GlobFs, MemoryFs, MountOptions, MountedDir, VfsError, WriteSeekFile,
    util,
};
use tempfile::TempDir;

// ============================================================================
// Shared test setup
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create the scenario tree: `index.html`, `static/css/default.css`,
/// `static/js/default.js`, all empty.
fn site() -> TempDir {
    init_tracing();
    let dir = TempDir::new().expect("tempdir");
    touch(dir.path(), "index.html");
    touch(dir.path(), "static/css/default.css");
    touch(dir.path(), "static/js/default.js");
    dir
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parents");
    }
    fs::write(path, b"").expect("write file");
}

fn sorted_names(fs: &dyn Fs, name: &str) -> Vec<(String, bool)> {
    let mut names: Vec<_> = util::read_dir(fs, name)
        .expect("read_dir")
        .iter()
        .map(|e| (e.name().to_string(), e.is_dir()))
        .collect();
    names.sort();
    names
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_site_scenario() {
    let dir = site();
    let mounted = MountedDir::new(dir.path()).unwrap();

    let mut index = mounted.open("index.html").unwrap();
    assert!(!index.stat().unwrap().is_dir());
    index.close().unwrap();

    assert_eq!(
        sorted_names(&mounted, "."),
        vec![("index.html".to_string(), false), ("static".to_string(), true)]
    );

    let globber = mounted.as_glob_fs().expect("mounted dirs glob");
    // `*` never crosses a separator, so one level of `*/` stops at `static`.
    assert!(globber.glob("*/*.css").unwrap().is_empty());
    assert_eq!(globber.glob("*/*/*.css").unwrap(), vec!["static/css/default.css"]);
    assert_eq!(globber.glob("*/*/*.js").unwrap(), vec!["static/js/default.js"]);
}

#[test]
fn test_glob_results_are_relative() {
    let dir = site();
    let mounted = MountedDir::new(dir.path()).unwrap();
    let root = mounted.root().to_string_lossy().into_owned();

    for m in util::glob(&mounted, "**/*").unwrap() {
        assert!(!m.starts_with('/'), "{m} has a leading separator");
        assert!(!m.starts_with(&root), "{m} still carries the root");
        assert!(mounted.open(&m).is_ok(), "{m} does not reopen");
    }
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_listing_flags_directories() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "a.txt");
    fs::create_dir(dir.path().join("sub")).unwrap();

    let mounted = MountedDir::new(dir.path()).unwrap();
    assert_eq!(
        sorted_names(&mounted, "."),
        vec![("a.txt".to_string(), false), ("sub".to_string(), true)]
    );
}

#[test]
fn test_confinement_never_reaches_outside() {
    let outer = TempDir::new().unwrap();
    fs::write(outer.path().join("secret"), b"top secret").unwrap();
    let root = outer.path().join("root");
    fs::create_dir(&root).unwrap();

    let mounted = MountedDir::read_write(&root).unwrap();
    for name in ["../secret", "./../secret", "/secret", "a/../../secret"] {
        let err = mounted.open(name).unwrap_err();
        assert!(matches!(err, VfsError::InvalidPath { .. }), "{name}: {err}");
    }
    assert_eq!(fs::read(outer.path().join("secret")).unwrap(), b"top secret");
}

#[test]
fn test_read_only_write_leaves_file_unchanged() {
    let dir = site();
    fs::write(dir.path().join("index.html"), b"<p>keep</p>").unwrap();
    let mounted = MountedDir::new(dir.path()).unwrap();

    let mut file = mounted.open("index.html").unwrap();
    let before = file.stat().unwrap();
    let ws = file.as_write_seek().expect("files can seek");
    ws.seek(SeekFrom::End(0)).unwrap();
    assert!(matches!(ws.write(b"<p>more</p>"), Err(VfsError::Unsupported { .. })));
    let after = file.stat().unwrap();

    assert_eq!(before.size, after.size);
    assert_eq!(fs::read(dir.path().join("index.html")).unwrap(), b"<p>keep</p>");
}

#[test]
fn test_closed_handle_rejects_everything() {
    let dir = site();
    let mounted = MountedDir::read_write(dir.path()).unwrap();
    let mut file = mounted.open("index.html").unwrap();
    file.close().unwrap();

    assert!(file.read(&mut [0u8; 8]).is_err());
    assert!(file.stat().is_err());
    let ws = file.as_write_seek().unwrap();
    assert!(ws.write(b"x").is_err());
    assert!(ws.seek(SeekFrom::Start(0)).is_err());
    assert!(file.close().is_err());
}

#[test]
fn test_instances_on_same_root_agree() {
    let dir = site();
    let first = MountedDir::new(dir.path()).unwrap();
    let second = MountedDir::with_options(MountOptions::new(dir.path())).unwrap();

    assert_eq!(first.root(), second.root());
    assert_eq!(sorted_names(&first, "static"), sorted_names(&second, "static"));
    assert_eq!(
        util::glob(&first, "static/*/*").unwrap(),
        util::glob(&second, "static/*/*").unwrap()
    );
    assert_eq!(
        util::stat(&first, "static/css/default.css").unwrap().size,
        util::stat(&second, "static/css/default.css").unwrap().size
    );
}

#[test]
fn test_relative_root_resolves_against_cwd() {
    let mounted = MountedDir::with_options(MountOptions::new("some/relative/dir").loose()).unwrap();
    assert!(mounted.root().is_absolute());
    assert!(mounted.root().ends_with("some/relative/dir"));
}

// ============================================================================
// Substitution
// ============================================================================

#[test]
fn test_backends_are_interchangeable() {
    let dir = site();
    fs::write(dir.path().join("index.html"), b"<h1>hi</h1>").unwrap();
    let mounted = MountedDir::new(dir.path()).unwrap();

    let mut memory = MemoryFs::new();
    memory.insert_file("index.html", "<h1>hi</h1>").unwrap();
    memory.insert_file("static/css/default.css", "").unwrap();
    memory.insert_file("static/js/default.js", "").unwrap();

    let backends: [&dyn Fs; 2] = [&mounted, &memory];
    for backend in backends {
        assert_eq!(util::read_file(backend, "index.html").unwrap(), b"<h1>hi</h1>");
        assert_eq!(
            sorted_names(backend, "static"),
            vec![("css".to_string(), true), ("js".to_string(), true)]
        );
    }

    assert!(mounted.capabilities().contains(Capabilities::GLOB));
    assert!(!memory.capabilities().contains(Capabilities::GLOB));
    assert!(memory.capabilities().contains(Capabilities::READ_DIR));
}
