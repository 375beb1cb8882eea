use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directories currently shown with their children.
///
/// Paths are never pruned when a directory disappears; a stale entry only
/// matters again if the same path is listed later.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    open: HashSet<PathBuf>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.open.contains(path)
    }

    /// Record `path` as expanded or collapsed. Returns whether it changed.
    pub fn set(&mut self, path: &Path, expanded: bool) -> bool {
        if expanded {
            self.open.insert(path.to_path_buf())
        } else {
            self.open.remove(path)
        }
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
