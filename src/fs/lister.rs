use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// One directory entry as seen by the projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub depth: usize,
}

impl Entry {
    /// Build an entry from a filesystem path.
    ///
    /// Symlinks are followed so the entry carries the target's type; a
    /// dangling link fails here.
    pub fn new(path: &Path, depth: usize) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            is_dir: metadata.is_dir(),
            depth,
        })
    }
}

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Read one level of `dir`, returning entries at `depth` sorted by name.
///
/// Unlike a browsing tree, failures are not skipped: an unreadable entry or
/// a dangling symlink aborts the listing so no partial projection is written.
/// Names that are not valid UTF-8 are skipped, since their line could not be
/// decoded back to the same path.
pub fn list_dir(dir: &Path, depth: usize, show_hidden: bool) -> Result<Vec<Entry>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(text) = name.to_str() else {
            warn!(dir = %dir.display(), name = ?name, "skipping non-UTF-8 name");
            continue;
        };
        if !show_hidden && is_hidden_name(text) {
            continue;
        }
        names.push(name);
    }
    names.sort();

    names
        .iter()
        .map(|name| Entry::new(&dir.join(name), depth))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        File::create(dir.path().join("file_b.rs")).unwrap();
        File::create(dir.path().join("file_a.txt")).unwrap();
        File::create(dir.path().join(".env")).unwrap();
        dir
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn entry_for_file() {
        let dir = setup_test_dir();
        let entry = Entry::new(&dir.path().join("file_a.txt"), 2).unwrap();
        assert!(!entry.is_dir);
        assert_eq!(entry.name, "file_a.txt");
        assert_eq!(entry.depth, 2);
        assert!(!is_hidden_name(&entry.name));
    }

    #[test]
    fn entry_for_directory() {
        let dir = setup_test_dir();
        let entry = Entry::new(&dir.path().join("alpha"), 0).unwrap();
        assert!(entry.is_dir);
        assert_eq!(entry.path, dir.path().join("alpha"));
    }

    #[test]
    fn list_sorts_by_name() {
        let dir = setup_test_dir();
        let entries = list_dir(dir.path(), 0, false).unwrap();
        assert_eq!(
            names(&entries),
            vec!["alpha", "beta", "file_a.txt", "file_b.rs"]
        );
    }

    #[test]
    fn list_omits_dotfiles_by_default() {
        let dir = setup_test_dir();
        let entries = list_dir(dir.path(), 0, false).unwrap();
        assert!(!names(&entries).contains(&".env"));
    }

    #[test]
    fn list_includes_dotfiles_when_enabled() {
        let dir = setup_test_dir();
        let entries = list_dir(dir.path(), 0, true).unwrap();
        assert_eq!(names(&entries)[0], ".env");
        assert!(is_hidden_name(&entries[0].name));
    }

    #[test]
    fn list_assigns_depth() {
        let dir = setup_test_dir();
        let entries = list_dir(dir.path(), 3, false).unwrap();
        assert!(entries.iter().all(|e| e.depth == 3));
    }

    #[test]
    fn list_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(list_dir(dir.path(), 0, true).unwrap().is_empty());
    }

    #[test]
    fn list_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let result = list_dir(&dir.path().join("gone"), 0, false);
        assert!(matches!(result, Err(crate::error::AppError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_takes_target_type() {
        let dir = setup_test_dir();
        std::os::unix::fs::symlink(dir.path().join("alpha"), dir.path().join("link")).unwrap();
        let entries = list_dir(dir.path(), 0, false).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert!(link.is_dir);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_aborts_listing() {
        let dir = setup_test_dir();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("broken")).unwrap();
        assert!(list_dir(dir.path(), 0, false).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn hidden_dangling_symlink_is_skipped_when_hidden() {
        let dir = setup_test_dir();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join(".broken"))
            .unwrap();
        assert!(list_dir(dir.path(), 0, false).is_ok());
        assert!(list_dir(dir.path(), 0, true).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = setup_test_dir();
        let odd = dir.path().join(OsStr::from_bytes(b"d\xff"));
        fs::create_dir(&odd).unwrap();
        File::create(odd.join("x.txt")).unwrap();

        let entries = list_dir(dir.path(), 0, true).unwrap();
        assert_eq!(
            names(&entries),
            vec![".env", "alpha", "beta", "file_a.txt", "file_b.rs"]
        );
        assert!(entries.iter().all(|e| e.path.exists()));
    }
}
