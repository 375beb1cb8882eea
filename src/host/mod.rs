//! Contracts with the text-editing host and the outside world.

pub mod address;
pub mod plumb;
pub mod scratch;

use std::path::Path;

use crate::error::Result;

/// A range of the buffer in character offsets, `q0 <= q1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector {
    pub q0: usize,
    pub q1: usize,
}

impl Selector {
    pub fn new(q0: usize, q1: usize) -> Self {
        Self { q0, q1 }
    }

    pub fn point(q: usize) -> Self {
        Self { q0: q, q1: q }
    }

    pub fn is_empty(&self) -> bool {
        self.q0 == self.q1
    }
}

/// The editor buffer holding the projection.
pub trait Editor {
    /// Read the text covered by `selector`.
    fn read_range(&mut self, selector: Selector) -> Result<String>;

    /// Replace the text covered by `selector` with `text`.
    fn write_at(&mut self, selector: Selector, text: &str) -> Result<()>;

    /// Evaluate an address expression against the current buffer and
    /// selection.
    fn evaluate_address(&mut self, expression: &str) -> Result<Selector>;

    /// Move the user-visible selection.
    fn set_selection(&mut self, selector: Selector) -> Result<()>;
}

/// Receives activated file paths, such as a plumber.
pub trait ActivationSink {
    fn send(&mut self, path: &Path, root: &Path) -> Result<()>;
}

/// Starts detached processes.
pub trait ProcessLauncher {
    fn spawn(&mut self, executable: &Path, working_dir: &Path) -> Result<()>;
}

/// Where a host event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A command executed in the tag line.
    TagExecute,
    /// Text executed in the body.
    BodyExecute,
    /// A look-up in the tag line.
    TagLook,
    /// A look-up (activation) in the body.
    BodyLook,
}

/// One user interaction reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub origin: Origin,
    /// Command text for tag events.
    pub text: String,
    pub q0: usize,
    pub q1: usize,
    /// Chorded secondary argument, `<window>:<address>`.
    pub chord: Option<String>,
}

impl HostEvent {
    pub fn command(text: impl Into<String>, chord: Option<String>) -> Self {
        Self {
            origin: Origin::TagExecute,
            text: text.into(),
            q0: 0,
            q1: 0,
            chord,
        }
    }

    pub fn body(origin: Origin, position: usize) -> Self {
        Self {
            origin,
            text: String::new(),
            q0: position,
            q1: position,
            chord: None,
        }
    }

    pub fn selector(&self) -> Selector {
        Selector::new(self.q0, self.q1)
    }

    /// A text selection or chorded argument is left to the host.
    pub fn is_complex(&self) -> bool {
        !self.selector().is_empty() || self.chord.as_deref().is_some_and(|c| !c.is_empty())
    }
}
