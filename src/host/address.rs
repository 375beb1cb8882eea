//! Evaluation of editor address expressions.
//!
//! Supported forms:
//!
//! - `#n` character offset, `n` line number (`0` is the empty start),
//!   `$` end of text, `.` the current selection
//! - `/re/` search forward from the current selection
//! - `+` / `-` followed by a line count, `#n`, or `/re/`; a bare sign
//!   moves one line
//! - `a,b` from the start of `a` to the end of `b`; either side may be
//!   omitted (`,` is the whole text)
//!
//! Inside a pattern `\/` stands for a literal slash. Patterns are compiled in
//! multi-line mode so `^` and `$` anchor at line boundaries, and searches
//! wrap around the end of the text.

use std::ops::Range;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::host::Selector;

/// Evaluate `expression` against `text` with `dot` as the current selection.
pub fn evaluate(text: &str, dot: Selector, expression: &str) -> Result<Selector> {
    let eval = Evaluator { text };
    let dot = eval.to_bytes(dot)?;
    let mut parser = Parser::new(expression);
    let range = parser.compound(&eval, dot)?;
    if let Some(c) = parser.peek() {
        return Err(AppError::protocol(format!(
            "unexpected {c:?} in address {expression:?}"
        )));
    }
    Ok(eval.to_chars(range))
}

struct Evaluator<'t> {
    text: &'t str,
}

impl Evaluator<'_> {
    fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    fn byte_offset(&self, chars: usize) -> Result<usize> {
        self.text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.text.len()))
            .nth(chars)
            .ok_or_else(|| AppError::protocol(format!("address #{chars} out of range")))
    }

    fn char_offset(&self, byte: usize) -> usize {
        self.text[..byte].chars().count()
    }

    fn to_bytes(&self, sel: Selector) -> Result<Range<usize>> {
        Ok(self.byte_offset(sel.q0)?..self.byte_offset(sel.q1)?)
    }

    fn to_chars(&self, range: Range<usize>) -> Selector {
        Selector::new(self.char_offset(range.start), self.char_offset(range.end))
    }

    fn line_start(&self, mut p: usize) -> usize {
        let b = self.bytes();
        while p > 0 && b[p - 1] != b'\n' {
            p -= 1;
        }
        p
    }

    fn line_end(&self, mut p: usize) -> usize {
        let b = self.bytes();
        while p < b.len() && b[p] != b'\n' {
            p += 1;
        }
        if p < b.len() {
            p += 1;
        }
        p
    }

    fn line(&self, n: usize) -> Result<Range<usize>> {
        if n == 0 {
            return Ok(0..0);
        }
        self.lines_forward(0..0, n)
    }

    /// The `n`th line after the one holding the end of `dot`.
    fn lines_forward(&self, dot: Range<usize>, n: usize) -> Result<Range<usize>> {
        if n == 0 {
            return Ok(dot.end..dot.end);
        }
        let b = self.bytes();
        let (mut p, mut count) = if dot.end == 0 {
            (0, 1)
        } else {
            (dot.end, usize::from(b[dot.end - 1] == b'\n'))
        };
        while count < n {
            if p >= b.len() {
                return Err(AppError::protocol(format!("line +{n} out of range")));
            }
            if b[p] == b'\n' {
                count += 1;
            }
            p += 1;
        }
        Ok(p..self.line_end(p))
    }

    /// The `n`th line before the one holding the start of `dot`. Stepping
    /// back from the first line lands on the empty line 0.
    fn lines_backward(&self, dot: Range<usize>, n: usize) -> Result<Range<usize>> {
        if n == 0 {
            return Ok(dot.start..dot.start);
        }
        let mut start = self.line_start(dot.start);
        for step in 1..=n {
            if start == 0 {
                return if step == n {
                    Ok(0..0)
                } else {
                    Err(AppError::protocol(format!("line -{n} out of range")))
                };
            }
            let end = start;
            start = self.line_start(end - 1);
            if step == n {
                return Ok(start..end);
            }
        }
        Ok(start..start)
    }

    fn compile(&self, pattern: &str) -> Result<Regex> {
        Regex::new(&format!("(?m){pattern}"))
            .map_err(|e| AppError::protocol(format!("bad pattern /{pattern}/: {e}")))
    }

    fn search_forward(&self, from: usize, pattern: &str) -> Result<Range<usize>> {
        let re = self.compile(pattern)?;
        re.find_at(self.text, from)
            .or_else(|| re.find(self.text).filter(|m| m.start() < from))
            .map(|m| m.range())
            .ok_or_else(|| AppError::protocol(format!("no match for /{pattern}/")))
    }

    fn search_backward(&self, from: usize, pattern: &str) -> Result<Range<usize>> {
        let re = self.compile(pattern)?;
        let mut before = None;
        let mut last = None;
        for m in re.find_iter(self.text) {
            if m.end() <= from && m.start() < from {
                before = Some(m.range());
            }
            last = Some(m.range());
        }
        before
            .or(last)
            .ok_or_else(|| AppError::protocol(format!("no match for /{pattern}/")))
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn number(&mut self) -> Option<usize> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }

    fn required_number(&mut self) -> Result<usize> {
        self.number()
            .ok_or_else(|| AppError::protocol(format!("expected number at {}", self.pos)))
    }

    /// Read a `/`-delimited pattern; the opening slash is already consumed.
    fn pattern(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '/' => break,
                '\\' => match self.bump() {
                    Some('/') => out.push('/'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                },
                _ => out.push(c),
            }
        }
        out
    }

    fn compound(&mut self, eval: &Evaluator<'_>, dot: Range<usize>) -> Result<Range<usize>> {
        let left = if self.peek() == Some(',') {
            0..0
        } else {
            self.simple(eval, dot.clone())?
        };
        if self.peek() != Some(',') {
            return Ok(left);
        }
        self.bump();
        let right = if self.peek().is_some() {
            self.simple(eval, dot)?
        } else {
            let len = eval.text.len();
            len..len
        };
        if left.start > right.end {
            return Err(AppError::protocol("address range runs backwards"));
        }
        Ok(left.start..right.end)
    }

    fn simple(&mut self, eval: &Evaluator<'_>, dot: Range<usize>) -> Result<Range<usize>> {
        let mut current = match self.peek() {
            Some('#') => {
                self.bump();
                let at = eval.byte_offset(self.required_number()?)?;
                at..at
            }
            Some(c) if c.is_ascii_digit() => eval.line(self.required_number()?)?,
            Some('$') => {
                self.bump();
                eval.text.len()..eval.text.len()
            }
            Some('.') => {
                self.bump();
                dot
            }
            Some('/') => {
                self.bump();
                let pattern = self.pattern();
                eval.search_forward(dot.end, &pattern)?
            }
            Some('+') | Some('-') => dot,
            Some(c) => {
                return Err(AppError::protocol(format!("unexpected {c:?} in address")));
            }
            None => return Err(AppError::protocol("empty address")),
        };

        while let Some(sign @ ('+' | '-')) = self.peek() {
            self.bump();
            let forward = sign == '+';
            current = match self.peek() {
                Some('/') => {
                    self.bump();
                    let pattern = self.pattern();
                    if forward {
                        eval.search_forward(current.end, &pattern)?
                    } else {
                        eval.search_backward(current.start, &pattern)?
                    }
                }
                Some('#') => {
                    self.bump();
                    let n = self.required_number()?;
                    let at = if forward {
                        eval.char_offset(current.end) + n
                    } else {
                        eval.char_offset(current.start)
                            .checked_sub(n)
                            .ok_or_else(|| AppError::protocol("character offset before start"))?
                    };
                    let at = eval.byte_offset(at)?;
                    at..at
                }
                _ => {
                    let n = self.number().unwrap_or(1);
                    if forward {
                        eval.lines_forward(current, n)?
                    } else {
                        eval.lines_backward(current, n)?
                    }
                }
            };
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "▾ b/\n  \td.txt\n  c.txt\n\n";

    fn eval(expression: &str) -> Result<Selector> {
        evaluate(TEXT, Selector::point(0), expression)
    }

    #[test]
    fn character_offsets() {
        assert_eq!(eval("#0").unwrap(), Selector::point(0));
        assert_eq!(eval("#7").unwrap(), Selector::point(7));
        assert!(eval("#999").is_err());
    }

    #[test]
    fn whole_text() {
        assert_eq!(eval(",").unwrap(), Selector::new(0, 23));
        assert_eq!(eval("0,$").unwrap(), Selector::new(0, 23));
    }

    #[test]
    fn line_numbers() {
        assert_eq!(eval("0").unwrap(), Selector::point(0));
        assert_eq!(eval("1").unwrap(), Selector::new(0, 5));
        assert_eq!(eval("2").unwrap(), Selector::new(5, 14));
        assert_eq!(eval("3,4").unwrap(), Selector::new(14, 23));
        assert!(eval("9").is_err());
    }

    #[test]
    fn line_containing_offset() {
        assert_eq!(eval("#7-+").unwrap(), Selector::new(5, 14));
        assert_eq!(eval("#2-+").unwrap(), Selector::new(0, 5));
        assert_eq!(eval("#14-+").unwrap(), Selector::new(14, 22));
    }

    #[test]
    fn relative_lines() {
        assert_eq!(eval("2+").unwrap(), Selector::new(14, 22));
        assert_eq!(eval("3-").unwrap(), Selector::new(5, 14));
        assert_eq!(eval("3-2").unwrap(), Selector::new(0, 5));
    }

    #[test]
    fn forward_searches_chain() {
        let sel = eval("0+/^..b\\/?$/+/^..\td\\.txt\\/?$/").unwrap();
        assert_eq!(sel, Selector::new(5, 13));
    }

    #[test]
    fn bare_pattern_searches_forward() {
        assert_eq!(eval("/c\\.txt/").unwrap(), Selector::new(16, 21));
    }

    #[test]
    fn backward_search() {
        let sel = evaluate(TEXT, Selector::point(16), "-/^▾/").unwrap();
        assert_eq!(sel, Selector::new(0, 1));
    }

    #[test]
    fn forward_search_wraps() {
        let sel = evaluate(TEXT, Selector::point(20), "+/b\\//").unwrap();
        assert_eq!(sel, Selector::new(2, 4));
    }

    #[test]
    fn missing_match_is_an_error() {
        let err = eval("0+/^..nothing/").unwrap_err();
        assert!(matches!(err, AppError::EditorProtocol(_)));
    }

    #[test]
    fn dot_is_current_selection() {
        let sel = evaluate(TEXT, Selector::new(5, 14), ".").unwrap();
        assert_eq!(sel, Selector::new(5, 14));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(eval("?").is_err());
        assert!(eval("").is_err());
        assert!(eval("1x").is_err());
        assert!(eval("/(/").is_err());
    }

    #[test]
    fn dot_out_of_range_is_rejected() {
        assert!(evaluate(TEXT, Selector::point(100), ".").is_err());
    }
}
