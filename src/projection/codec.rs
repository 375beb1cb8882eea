//! Text grammar of one projected line: `<flag><space><tabs><name>`.

use crate::error::{AppError, Result};
use crate::fs::lister::Entry;

/// One indentation unit.
pub const INDENT: char = '\t';
/// Separates the status flag from the indentation.
pub const SEPARATOR: char = ' ';
/// Suffix marking directory names.
pub const DIR_SUFFIX: char = '/';

/// Status flag shown in the first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    File,
    Collapsed,
    Expanded,
}

impl Flag {
    pub fn glyph(self) -> char {
        match self {
            Flag::File => ' ',
            Flag::Collapsed => '▸',
            Flag::Expanded => '▾',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Flag::File),
            '▸' => Some(Flag::Collapsed),
            '▾' => Some(Flag::Expanded),
            _ => None,
        }
    }

    pub fn is_dir(self) -> bool {
        !matches!(self, Flag::File)
    }

    /// Flag for a directory in the given state.
    pub fn directory(expanded: bool) -> Self {
        if expanded {
            Flag::Expanded
        } else {
            Flag::Collapsed
        }
    }
}

/// A decoded projection line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub flag: Flag,
    pub depth: usize,
    pub name: String,
}

impl Line {
    pub fn for_entry(entry: &Entry, expanded: bool) -> Self {
        let flag = if entry.is_dir {
            Flag::directory(expanded)
        } else {
            Flag::File
        };
        Self {
            flag,
            depth: entry.depth,
            name: entry.name.clone(),
        }
    }

    /// Encode without the line terminator.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + self.depth + 6);
        out.push(self.flag.glyph());
        out.push(SEPARATOR);
        out.extend(std::iter::repeat(INDENT).take(self.depth));
        out.push_str(&self.name);
        if self.flag.is_dir() {
            out.push(DIR_SUFFIX);
        }
        out
    }

    /// Decode one line of buffer text.
    ///
    /// Returns `Ok(None)` for a line that names nothing, such as the blank
    /// terminator. A name beginning with [`INDENT`] is read as extra depth.
    pub fn decode(text: &str) -> Result<Option<Self>> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        let mut chars = text.chars();
        let Some(glyph) = chars.next() else {
            return Ok(None);
        };
        let flag = Flag::from_glyph(glyph)
            .ok_or_else(|| AppError::address(format!("unknown status flag {glyph:?}")))?;
        match chars.next() {
            Some(SEPARATOR) => {}
            None => return Ok(None),
            Some(c) => {
                return Err(AppError::address(format!(
                    "expected separator after flag, found {c:?}"
                )))
            }
        }

        let rest = chars.as_str();
        let name = rest.trim_start_matches(INDENT);
        let depth = rest.len() - name.len();
        let name = if flag.is_dir() {
            name.strip_suffix(DIR_SUFFIX).unwrap_or(name)
        } else {
            name
        };
        if name.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            flag,
            depth,
            name: name.to_string(),
        }))
    }
}
