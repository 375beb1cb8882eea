//! The session controller: owns the projection root and expansion state and
//! turns host events into buffer edits.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::APP_NAME;
use crate::error::{AppError, Result};
use crate::host::{ActivationSink, Editor, HostEvent, Origin, ProcessLauncher};
use crate::projection::expansion::ExpansionState;
use crate::projection::projector::Projector;
use crate::projection::resolver::{self, focus_address, Resolved};
use crate::projection::snapshot::Snapshot;

/// Commands offered in the tag line.
pub const TAG_COMMANDS: &[&str] = &["Get", "All", "Up", "Cd", "Win", "Xplor"];

/// What the host should do after an event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    /// A file was sent to the activation sink.
    Activated(PathBuf),
    /// A path was printed to the log.
    Printed(PathBuf),
    /// The event is not ours; the host applies its default handling.
    Forward(HostEvent),
    /// The window should close.
    Quit,
}

/// Settings fixed for the life of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub show_hidden: bool,
    /// Program started by `Win`.
    pub terminal: PathBuf,
    /// Program started by `Xplor`.
    pub explorer: PathBuf,
}

/// One explorer window.
pub struct Session<E: Editor> {
    editor: E,
    sink: Box<dyn ActivationSink>,
    launcher: Box<dyn ProcessLauncher>,
    root: PathBuf,
    expansion: ExpansionState,
    options: SessionOptions,
}

impl<E: Editor> Session<E> {
    pub fn new(
        editor: E,
        root: &Path,
        options: SessionOptions,
        sink: Box<dyn ActivationSink>,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            editor,
            sink,
            launcher,
            root: root.to_path_buf(),
            expansion: ExpansionState::new(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn show_hidden(&self) -> bool {
        self.options.show_hidden
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    /// Name of the window, used as the prefix of chorded locations.
    pub fn window_name(&self) -> String {
        format!("{}/-{}", self.root.display(), APP_NAME)
    }

    /// Dispatch one host event.
    pub fn handle(&mut self, event: HostEvent) -> Result<Outcome> {
        match event.origin {
            Origin::TagExecute => match event.text.as_str() {
                "Del" => Ok(Outcome::Quit),
                "Get" => self.refresh().map(|_| Outcome::Handled),
                "All" => self.toggle_hidden().map(|_| Outcome::Handled),
                "Up" => self.ascend().map(|_| Outcome::Handled),
                "Cd" => {
                    let dir = self.location_dir(event.chord.as_deref())?;
                    self.change_root(&dir).map(|_| Outcome::Handled)
                }
                "Win" => {
                    let dir = self.location_dir(event.chord.as_deref())?;
                    let terminal = self.options.terminal.clone();
                    self.launcher.spawn(&terminal, &dir)?;
                    Ok(Outcome::Handled)
                }
                "Xplor" => {
                    let dir = self.location_dir(event.chord.as_deref())?;
                    let explorer = self.options.explorer.clone();
                    self.launcher.spawn(&explorer, &dir)?;
                    Ok(Outcome::Handled)
                }
                _ => Ok(Outcome::Forward(event)),
            },
            Origin::BodyExecute if !event.is_complex() => self.print(event.q0),
            Origin::BodyLook if !event.is_complex() => self.toggle(event.q0),
            _ => Ok(Outcome::Forward(event)),
        }
    }

    /// Render the whole projection again, keeping the expansion state.
    pub fn refresh(&mut self) -> Result<()> {
        let text = Projector::new(&self.expansion, self.options.show_hidden).render_full(&self.root)?;
        let all = self.editor.evaluate_address(",")?;
        self.editor.write_at(all, &text)?;
        let root = self.root.clone();
        self.focus(&root)
    }

    /// Flip dotfile listing and re-render. The flag is restored if the
    /// render fails.
    pub fn toggle_hidden(&mut self) -> Result<()> {
        self.options.show_hidden = !self.options.show_hidden;
        let result = self.refresh();
        if result.is_err() {
            self.options.show_hidden = !self.options.show_hidden;
        }
        result
    }

    /// Move the root to its parent.
    pub fn ascend(&mut self) -> Result<()> {
        let parent = self.root.parent().unwrap_or(&self.root).to_path_buf();
        self.change_root(&parent)
    }

    pub fn change_root(&mut self, root: &Path) -> Result<()> {
        info!(from = %self.root.display(), to = %root.display(), "changing root");
        self.root = root.to_path_buf();
        self.refresh()
    }

    /// Activate the entry at `position`: files go to the activation sink,
    /// directories flip between expanded and collapsed.
    pub fn toggle(&mut self, position: usize) -> Result<Outcome> {
        let snapshot = self.snapshot()?;
        let target = resolver::resolve(&snapshot, &self.root, position)?;
        if !fs::metadata(&target.path)?.is_dir() {
            self.sink.send(&target.path, &self.root)?;
            info!(path = %target.path.display(), "activated");
            return Ok(Outcome::Activated(target.path));
        }
        let expanded = !self.expansion.is_expanded(&target.path);
        self.show(&snapshot, &target, expanded)?;
        Ok(Outcome::Handled)
    }

    /// Expand the directory at `position`; anything else is left alone.
    pub fn expand(&mut self, position: usize) -> Result<()> {
        self.set_expanded(position, true)
    }

    /// Collapse the directory at `position`; anything else is left alone.
    pub fn collapse(&mut self, position: usize) -> Result<()> {
        self.set_expanded(position, false)
    }

    fn set_expanded(&mut self, position: usize, expanded: bool) -> Result<()> {
        let snapshot = self.snapshot()?;
        let target = resolver::resolve(&snapshot, &self.root, position)?;
        if !target.entry.flag.is_dir() {
            return Ok(());
        }
        self.show(&snapshot, &target, expanded)
    }

    /// Patch the buffer so `target` shows as `expanded`, then record the new
    /// state and reselect the entry. State only changes once the buffer
    /// write succeeded.
    fn show(&mut self, snapshot: &Snapshot, target: &Resolved, expanded: bool) -> Result<()> {
        let patch = Projector::new(&self.expansion, self.options.show_hidden)
            .toggle_patch(snapshot, target, expanded)?;
        if !patch.is_noop(snapshot) {
            self.editor
                .write_at(snapshot.selector(patch.lines.clone()), &patch.text())?;
        }
        let changed = self.expansion.set(&target.path, expanded);
        debug!(path = %target.path.display(), expanded, changed, "expansion committed");
        self.focus(&target.path)
    }

    /// Log the path of the entry at `position`.
    pub fn print(&mut self, position: usize) -> Result<Outcome> {
        let snapshot = self.snapshot()?;
        let target = resolver::resolve(&snapshot, &self.root, position)?;
        info!(path = %target.path.display(), "print");
        Ok(Outcome::Printed(target.path))
    }

    /// Resolve the entry at `position` without acting on it.
    pub fn resolve(&mut self, position: usize) -> Result<Resolved> {
        let snapshot = self.snapshot()?;
        resolver::resolve(&snapshot, &self.root, position)
    }

    /// Select the line showing `path`. A path that is not visible leaves the
    /// selection where it was.
    pub fn focus(&mut self, path: &Path) -> Result<()> {
        let address = focus_address(&self.root, path)?;
        match self.editor.evaluate_address(&address) {
            Ok(selector) => self.editor.set_selection(selector),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "focus target not visible");
                Ok(())
            }
        }
    }

    /// Directory named by a chorded location `<window>:<address>[,...]`.
    /// A file location names its parent directory.
    pub fn location_dir(&mut self, chord: Option<&str>) -> Result<PathBuf> {
        let chord = chord
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::address("command needs a location in this window"))?;
        let prefix = format!("{}:", self.window_name());
        let address = chord
            .strip_prefix(&prefix)
            .ok_or_else(|| AppError::address(format!("location {chord:?} is not in this window")))?;
        let first = address.split(',').next().unwrap_or(address);
        let selector = self.editor.evaluate_address(first)?;
        let target = self.resolve(selector.q0)?;
        if fs::metadata(&target.path)?.is_dir() {
            return Ok(target.path);
        }
        Ok(target
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone()))
    }

    fn snapshot(&mut self) -> Result<Snapshot> {
        let all = self.editor.evaluate_address(",")?;
        let text = self.editor.read_range(all)?;
        Ok(Snapshot::new(&text))
    }
}
