use crate::error::{AppError, Result};
use crate::host::{address, Editor, Selector};

/// In-memory editor buffer backing the terminal front end.
#[derive(Debug, Default, Clone)]
pub struct ScratchBuffer {
    text: String,
    dot: Selector,
    dirty: bool,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selector {
        self.dot
    }

    /// Whether the text changed since the last [`ScratchBuffer::mark_clean`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn byte_range(&self, selector: Selector) -> Result<std::ops::Range<usize>> {
        if selector.q0 > selector.q1 {
            return Err(AppError::protocol(format!(
                "selector #{},#{} runs backwards",
                selector.q0, selector.q1
            )));
        }
        let mut bounds = self
            .text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()));
        let start = bounds.nth(selector.q0);
        let end = if selector.q1 == selector.q0 {
            start
        } else {
            bounds.nth(selector.q1 - selector.q0 - 1)
        };
        match (start, end) {
            (Some(start), Some(end)) => Ok(start..end),
            _ => Err(AppError::protocol(format!(
                "selector #{},#{} is outside the buffer",
                selector.q0, selector.q1
            ))),
        }
    }
}

impl Editor for ScratchBuffer {
    fn read_range(&mut self, selector: Selector) -> Result<String> {
        let range = self.byte_range(selector)?;
        Ok(self.text[range].to_string())
    }

    fn write_at(&mut self, selector: Selector, text: &str) -> Result<()> {
        let range = self.byte_range(selector)?;
        self.text.replace_range(range, text);
        self.dirty = true;
        let written = selector.q0 + text.chars().count();
        self.dot = Selector::new(selector.q0, written);
        Ok(())
    }

    fn evaluate_address(&mut self, expression: &str) -> Result<Selector> {
        address::evaluate(&self.text, self.dot, expression)
    }

    fn set_selection(&mut self, selector: Selector) -> Result<()> {
        self.byte_range(selector)?;
        self.dot = selector;
        Ok(())
    }
}
