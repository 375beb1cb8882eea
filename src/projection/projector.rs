use std::ops::Range;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::fs::lister::list_dir;
use crate::projection::codec::{Flag, Line};
use crate::projection::expansion::ExpansionState;
use crate::projection::resolver::Resolved;
use crate::projection::snapshot::Snapshot;

/// A replacement of whole buffer lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Lines of the snapshot being replaced.
    pub lines: Range<usize>,
    pub replacement: Vec<Line>,
}

impl Patch {
    pub fn text(&self) -> String {
        encode_lines(&self.replacement)
    }

    /// Whether applying the patch would leave `snapshot` unchanged.
    pub fn is_noop(&self, snapshot: &Snapshot) -> bool {
        self.lines.len() == self.replacement.len()
            && self
                .lines
                .clone()
                .zip(&self.replacement)
                .all(|(index, line)| snapshot.line(index) == Some(line.encode().as_str()))
    }
}

/// Encode lines, each followed by a newline.
pub fn encode_lines(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.encode());
        out.push('\n');
    }
    out
}

/// Renders directory listings into projection lines.
pub struct Projector<'a> {
    expansion: &'a ExpansionState,
    show_hidden: bool,
}

impl<'a> Projector<'a> {
    pub fn new(expansion: &'a ExpansionState, show_hidden: bool) -> Self {
        Self {
            expansion,
            show_hidden,
        }
    }

    /// Lines for everything visible under `root`.
    pub fn render_lines(&self, root: &Path) -> Result<Vec<Line>> {
        let mut lines = Vec::new();
        self.render_contents(root, 0, &mut lines)?;
        Ok(lines)
    }

    /// The whole buffer text for `root`, ending with the blank terminator
    /// line so the host can always write after the last entry.
    pub fn render_full(&self, root: &Path) -> Result<String> {
        let lines = self.render_lines(root)?;
        debug!(root = %root.display(), lines = lines.len(), "full render");
        let mut text = encode_lines(&lines);
        text.push('\n');
        Ok(text)
    }

    fn render_contents(&self, dir: &Path, depth: usize, out: &mut Vec<Line>) -> Result<()> {
        for entry in list_dir(dir, depth, self.show_hidden)? {
            let expanded = entry.is_dir && self.expansion.is_expanded(&entry.path);
            out.push(Line::for_entry(&entry, expanded));
            if expanded {
                self.render_contents(&entry.path, depth + 1, out)?;
            }
        }
        Ok(())
    }

    /// Patch that shows `target` expanded or collapsed.
    ///
    /// The toggled line is re-encoded with its new glyph. Expanding lists the
    /// directory fresh, keeping descendants that are already expanded;
    /// collapsing drops the lines under it without touching the filesystem.
    pub fn toggle_patch(
        &self,
        snapshot: &Snapshot,
        target: &Resolved,
        expanded: bool,
    ) -> Result<Patch> {
        let end = subtree_end(snapshot, target.line, target.depth)?;
        let mut replacement = vec![Line {
            flag: Flag::directory(expanded),
            depth: target.depth,
            name: target.entry.name.clone(),
        }];
        if expanded {
            self.render_contents(&target.path, target.depth + 1, &mut replacement)?;
        }
        debug!(
            path = %target.path.display(),
            expanded,
            removed = end - target.line,
            inserted = replacement.len(),
            "incremental render"
        );
        Ok(Patch {
            lines: target.line..end,
            replacement,
        })
    }
}

/// One past the last line belonging to the subtree of line `index`.
///
/// The subtree ends at the first following line indented at `depth` or
/// less, at the blank terminator, or at the end of the buffer.
pub fn subtree_end(snapshot: &Snapshot, index: usize, depth: usize) -> Result<usize> {
    for next in index + 1..snapshot.len() {
        match snapshot.decode(next)? {
            Some(line) if line.depth > depth => continue,
            _ => return Ok(next),
        }
    }
    Ok(snapshot.len())
}
