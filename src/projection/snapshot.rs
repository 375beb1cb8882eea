use std::ops::Range;

use crate::error::Result;
use crate::host::Selector;
use crate::projection::codec::Line;

/// An immutable copy of the buffer split into lines.
///
/// Offsets are counted in characters, matching [`Selector`].
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    lines: Vec<String>,
    starts: Vec<usize>,
    len: usize,
    ends_with_newline: bool,
}

impl Snapshot {
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut starts = Vec::new();
        let mut offset = 0;
        for raw in text.split_inclusive('\n') {
            starts.push(offset);
            offset += raw.chars().count();
            lines.push(raw.strip_suffix('\n').unwrap_or(raw).to_string());
        }
        Self {
            lines,
            starts,
            len: offset,
            ends_with_newline: text.ends_with('\n'),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Decode line `index`; lines past the end name nothing.
    pub fn decode(&self, index: usize) -> Result<Option<Line>> {
        match self.line(index) {
            Some(text) => Line::decode(text),
            None => Ok(None),
        }
    }

    /// Index of the line containing character offset `position`.
    pub fn line_of(&self, position: usize) -> Option<usize> {
        if position > self.len || (position == self.len && self.ends_with_newline) {
            return None;
        }
        match self.starts.binary_search(&position) {
            Ok(index) => Some(index),
            Err(0) => None,
            Err(index) => Some(index - 1),
        }
    }

    /// Character offset where line `index` starts; one past the last line
    /// maps to the end of the text.
    pub fn offset_of(&self, index: usize) -> usize {
        self.starts.get(index).copied().unwrap_or(self.len)
    }

    /// Selector covering whole lines `range`, terminators included.
    pub fn selector(&self, range: Range<usize>) -> Selector {
        Selector::new(self.offset_of(range.start), self.offset_of(range.end))
    }
}
