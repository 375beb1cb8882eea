//! Mapping between buffer positions and filesystem paths.
//!
//! The buffer carries no parent pointers. A line's parent is the nearest
//! preceding line indented one level less, so a path is rebuilt by walking
//! backwards one level at a time.

use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};
use crate::projection::codec::{Flag, Line, INDENT};
use crate::projection::snapshot::Snapshot;

/// A buffer line resolved to the entry it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub depth: usize,
    /// Index of the line within the snapshot.
    pub line: usize,
    pub entry: Line,
}

/// Resolve the line containing character offset `position`.
pub fn resolve(snapshot: &Snapshot, root: &Path, position: usize) -> Result<Resolved> {
    let index = snapshot
        .line_of(position)
        .ok_or_else(|| AppError::address(format!("position #{position} is past the buffer")))?;
    resolve_line(snapshot, root, index)
}

/// Resolve line `index` of the snapshot.
pub fn resolve_line(snapshot: &Snapshot, root: &Path, index: usize) -> Result<Resolved> {
    let entry = snapshot
        .decode(index)?
        .ok_or_else(|| AppError::address(format!("line {} names no entry", index + 1)))?;

    let mut names = vec![entry.name.clone()];
    let mut cursor = index;
    for level in (1..=entry.depth).rev() {
        let (parent_index, parent) = enclosing(snapshot, cursor, level)?;
        names.push(parent.name);
        cursor = parent_index;
    }

    let mut path = root.to_path_buf();
    path.extend(names.iter().rev());
    Ok(Resolved {
        path,
        depth: entry.depth,
        line: index,
        entry,
    })
}

/// Find the parent of a line at `level` that sits at or after `below`.
///
/// Only moves towards the start of the buffer, so the whole walk from a
/// line to the root visits each line at most once.
fn enclosing(snapshot: &Snapshot, below: usize, level: usize) -> Result<(usize, Line)> {
    for index in (0..below).rev() {
        let Some(line) = snapshot.decode(index)? else {
            return Err(AppError::address(format!(
                "blank line {} inside the projection",
                index + 1
            )));
        };
        if line.depth >= level {
            continue;
        }
        if line.depth + 1 != level || line.flag != Flag::Expanded {
            return Err(AppError::address(format!(
                "line {} is not an expanded parent at depth {}",
                index + 1,
                level - 1
            )));
        }
        return Ok((index, line));
    }
    Err(AppError::address(format!(
        "no parent at depth {} before line {}",
        level - 1,
        below + 1
    )))
}

/// Split `path` into its components below `root`.
pub fn components(root: &Path, path: &Path) -> Result<Vec<String>> {
    let relative = path.strip_prefix(root).map_err(|_| {
        AppError::address(format!(
            "{} is outside {}",
            path.display(),
            root.display()
        ))
    })?;
    relative
        .components()
        .map(|component| match component {
            Component::Normal(name) => Ok(name.to_string_lossy().to_string()),
            other => Err(AppError::address(format!(
                "unexpected path component {:?} in {}",
                other,
                path.display()
            ))),
        })
        .collect()
}

/// Build the address expression selecting `path` in the buffer.
///
/// Starts at the beginning of the buffer and, for each component, searches
/// forward for the next line at that component's depth with that name. The
/// root itself is the start of the buffer.
pub fn focus_address(root: &Path, path: &Path) -> Result<String> {
    let mut steps = String::from("0");
    for (depth, name) in components(root, path)?.iter().enumerate() {
        let tabs: String = std::iter::repeat(INDENT).take(depth).collect();
        steps.push_str(&format!("+/^..{}{}\\/?$/", tabs, regex::escape(name)));
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario buffer: /a with b/ expanded over d.txt, then c.txt.
    const SCENARIO: &str = "▾ b/\n  \td.txt\n  c.txt\n\n";

    const DEEP: &str = "\
▾ src/
▾ \tfs/
  \t\tmod.rs
▸ \t\tnested/
  \tmain.rs
▾ tests/
  \tit.rs
  Cargo.toml

";

    fn snap(text: &str) -> Snapshot {
        Snapshot::new(text)
    }

    #[test]
    fn resolves_top_level_entry() {
        let resolved = resolve(&snap(SCENARIO), Path::new("/a"), 16).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/a/c.txt"));
        assert_eq!(resolved.depth, 0);
        assert_eq!(resolved.line, 2);
    }

    #[test]
    fn resolves_nested_file_through_parent() {
        // Any offset inside "  \td.txt".
        for position in 5..14 {
            let resolved = resolve(&snap(SCENARIO), Path::new("/a"), position).unwrap();
            assert_eq!(resolved.path, PathBuf::from("/a/b/d.txt"));
            assert_eq!(resolved.depth, 1);
        }
    }

    #[test]
    fn resolves_deep_entries() {
        let snapshot = snap(DEEP);
        let root = Path::new("/p");
        let expected = [
            "/p/src",
            "/p/src/fs",
            "/p/src/fs/mod.rs",
            "/p/src/fs/nested",
            "/p/src/main.rs",
            "/p/tests",
            "/p/tests/it.rs",
            "/p/Cargo.toml",
        ];
        for (index, want) in expected.iter().enumerate() {
            let resolved = resolve_line(&snapshot, root, index).unwrap();
            assert_eq!(resolved.path, PathBuf::from(want), "line {index}");
        }
    }

    #[test]
    fn directory_entry_keeps_its_flag() {
        let resolved = resolve_line(&snap(DEEP), Path::new("/p"), 3).unwrap();
        assert_eq!(resolved.entry.flag, Flag::Collapsed);
        assert_eq!(resolved.depth, 2);
    }

    #[test]
    fn blank_terminator_does_not_resolve() {
        let err = resolve_line(&snap(SCENARIO), Path::new("/a"), 3).unwrap_err();
        assert!(matches!(err, AppError::AddressResolution(_)));
    }

    #[test]
    fn position_past_end_does_not_resolve() {
        let len = SCENARIO.chars().count();
        assert!(resolve(&snap(SCENARIO), Path::new("/a"), len).is_err());
        assert!(resolve(&snap(SCENARIO), Path::new("/a"), len + 10).is_err());
    }

    #[test]
    fn orphan_line_fails_instead_of_looping() {
        let err = resolve_line(&snap("  \t\torphan\n"), Path::new("/a"), 0).unwrap_err();
        assert!(err.to_string().contains("no parent"));
    }

    #[test]
    fn skipped_level_is_corruption() {
        let text = "▾ top/\n  \t\ttoo-deep\n";
        assert!(resolve_line(&snap(text), Path::new("/a"), 1).is_err());
    }

    #[test]
    fn collapsed_parent_is_corruption() {
        let text = "▸ top/\n  \tchild\n";
        assert!(resolve_line(&snap(text), Path::new("/a"), 1).is_err());
    }

    #[test]
    fn focus_root_is_buffer_start() {
        assert_eq!(focus_address(Path::new("/a"), Path::new("/a")).unwrap(), "0");
    }

    #[test]
    fn focus_builds_one_step_per_component() {
        let address = focus_address(Path::new("/a"), Path::new("/a/b/d.txt")).unwrap();
        assert_eq!(address, "0+/^..b\\/?$/+/^..\td\\.txt\\/?$/");
    }

    #[test]
    fn focus_escapes_metacharacters() {
        let address = focus_address(Path::new("/a"), Path::new("/a/x+(1)")).unwrap();
        assert!(address.contains(r"x\+\(1\)"));
    }

    #[test]
    fn focus_outside_root_fails() {
        assert!(focus_address(Path::new("/a"), Path::new("/elsewhere")).is_err());
    }
}
