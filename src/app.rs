use std::path::PathBuf;
use std::time::Instant;

use ratatui::layout::Rect;
use tracing::{debug, error};

use crate::error::Result;
use crate::host::scratch::ScratchBuffer;
use crate::host::{Editor, HostEvent, Origin, Selector};
use crate::projection::snapshot::Snapshot;
use crate::session::{Outcome, Session};
use crate::theme::ThemeColors;

/// Main application state: one session over the in-memory buffer plus the
/// view state around it.
pub struct App {
    pub session: Session<ScratchBuffer>,
    pub theme: ThemeColors,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    pub status_is_error: bool,
    pub scroll_offset: usize,
    /// Screen area of the body, recorded at draw time for mouse hits.
    pub body_area: Rect,
}

impl App {
    pub fn new(session: Session<ScratchBuffer>, theme: ThemeColors) -> Self {
        Self {
            session,
            theme,
            should_quit: false,
            status_message: None,
            status_is_error: false,
            scroll_offset: 0,
            body_area: Rect::default(),
        }
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
        self.status_is_error = false;
    }

    /// Show an error in the status bar and log it.
    pub fn set_error_message(&mut self, msg: String) {
        error!("{msg}");
        self.status_message = Some((msg, Instant::now()));
        self.status_is_error = true;
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.session.editor().text())
    }

    /// Character offset of the current selection.
    pub fn position(&self) -> usize {
        self.session.editor().selection().q0
    }

    /// Index of the line holding the selection.
    pub fn selected_line(&self) -> usize {
        self.snapshot().line_of(self.position()).unwrap_or(0)
    }

    /// Number of entry lines, excluding the blank terminator.
    pub fn entry_count(&self) -> usize {
        self.snapshot()
            .lines()
            .take_while(|line| !line.is_empty())
            .count()
    }

    /// Select line `index`, clamped to the entry lines. An empty listing
    /// selects the start of the buffer.
    pub fn select_line(&mut self, index: usize) {
        let snapshot = self.snapshot();
        let count = self.entry_count();
        let index = index.min(count.saturating_sub(1));
        let selection = match snapshot.line(index) {
            Some(line) if count > 0 => {
                let start = snapshot.offset_of(index);
                Selector::new(start, start + line.chars().count())
            }
            _ => Selector::point(0),
        };
        if let Err(e) = self.session.editor_mut().set_selection(selection) {
            self.set_error_message(e.to_string());
        }
    }

    /// Move selection down by one line.
    pub fn select_next(&mut self) {
        self.select_line(self.selected_line() + 1);
    }

    /// Move selection up by one line.
    pub fn select_previous(&mut self) {
        self.select_line(self.selected_line().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.select_line(0);
    }

    pub fn select_last(&mut self) {
        self.select_line(usize::MAX);
    }

    /// Select the body row under screen row `y`.
    pub fn select_row(&mut self, y: u16) -> bool {
        let area = self.body_area;
        if y < area.y || y >= area.y + area.height {
            return false;
        }
        let index = self.scroll_offset + (y - area.y) as usize;
        if index >= self.entry_count() {
            return false;
        }
        self.select_line(index);
        true
    }

    /// Keep the selected line inside a window of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let selected = self.selected_line();
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + visible_height {
            self.scroll_offset = selected - visible_height + 1;
        }
    }

    /// Path of the entry under the selection, if it resolves.
    pub fn selected_path(&mut self) -> Option<PathBuf> {
        let position = self.position();
        self.session.resolve(position).ok().map(|r| r.path)
    }

    /// Right-hand status bar text: expansion count and dotfile mode.
    pub fn status_info(&self) -> String {
        let expansion = self.session.expansion();
        let mut info = if expansion.is_empty() {
            "all collapsed".to_string()
        } else {
            format!("{} expanded", expansion.len())
        };
        if self.session.show_hidden() {
            info.push_str(" | hidden shown");
        }
        info
    }

    /// Look at the selected entry: open files, toggle directories.
    pub fn look_selected(&mut self) {
        let event = HostEvent::body(Origin::BodyLook, self.position());
        self.dispatch(event);
    }

    /// Execute the selected entry, printing its path.
    pub fn execute_selected(&mut self) {
        let event = HostEvent::body(Origin::BodyExecute, self.position());
        self.dispatch(event);
    }

    /// Look at a word of the tag line; nothing in the tag is ours to open.
    pub fn tag_look(&mut self, word: &str) {
        let mut event = HostEvent::command(word, None);
        event.origin = Origin::TagLook;
        self.dispatch(event);
    }

    pub fn expand_selected(&mut self) {
        let position = self.position();
        let result = self.session.expand(position);
        self.report(result);
    }

    pub fn collapse_selected(&mut self) {
        let position = self.position();
        let result = self.session.collapse(position);
        self.report(result);
    }

    /// Run a tag command. Commands that take a location get the selected
    /// line as their chorded argument.
    pub fn command(&mut self, name: &str, with_location: bool) {
        let chord = with_location
            .then(|| format!("{}:#{}", self.session.window_name(), self.position()));
        self.dispatch(HostEvent::command(name, chord));
    }

    /// Hand an event to the session and reflect the outcome.
    pub fn dispatch(&mut self, event: HostEvent) {
        let outcome = self.session.handle(event);
        self.sync_view();
        match outcome {
            Ok(Outcome::Handled) => {}
            Ok(Outcome::Activated(path)) => {
                self.set_status_message(format!("sent {}", path.display()))
            }
            Ok(Outcome::Printed(path)) => self.set_status_message(path.display().to_string()),
            Ok(Outcome::Forward(event)) => {
                debug!(?event, "event left to the host");
            }
            Ok(Outcome::Quit) => self.quit(),
            Err(e) => self.set_error_message(e.to_string()),
        }
    }

    /// Pull the scroll position back inside the buffer after the session
    /// rewrote it.
    fn sync_view(&mut self) {
        if !self.session.editor().is_dirty() {
            return;
        }
        self.session.editor_mut().mark_clean();
        self.scroll_offset = self
            .scroll_offset
            .min(self.entry_count().saturating_sub(1));
    }

    fn report(&mut self, result: Result<()>) {
        self.sync_view();
        if let Err(e) = result {
            self.set_error_message(e.to_string());
        }
    }
}
