use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::projection::codec::{self, INDENT};
use crate::theme::ThemeColors;

/// Columns a depth tab occupies on screen.
const TAB_WIDTH: usize = 4;

/// Renders the projection buffer, one text line per row.
pub struct BodyWidget<'a> {
    text: &'a str,
    selected: Option<usize>,
    scroll: usize,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> BodyWidget<'a> {
    pub fn new(text: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            text,
            selected: None,
            scroll: 0,
            theme,
            block: None,
        }
    }

    pub fn selected(mut self, line: Option<usize>) -> Self {
        self.selected = line;
        self
    }

    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    fn line_style(&self, raw: &str) -> Style {
        match codec::Line::decode(raw) {
            Ok(Some(line)) if line.flag.is_dir() => Style::default()
                .fg(self.theme.dir_fg)
                .add_modifier(Modifier::BOLD),
            Ok(Some(line)) if line.name.starts_with('.') => {
                Style::default().fg(self.theme.hidden_fg)
            }
            _ => Style::default().fg(self.theme.file_fg),
        }
    }
}

/// Expand depth tabs for display.
fn expand_tabs(raw: &str) -> String {
    raw.replace(INDENT, &" ".repeat(TAB_WIDTH))
}

impl<'a> Widget for BodyWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if visible_height == 0 {
            return;
        }

        let rows = self
            .text
            .lines()
            .enumerate()
            .skip(self.scroll)
            .take(visible_height);

        for (row, (index, raw)) in rows.enumerate() {
            let y = inner_area.y + row as u16;
            let mut style = self.line_style(raw);
            if self.selected == Some(index) {
                style = style
                    .bg(self.theme.selected_bg)
                    .fg(self.theme.selected_fg);
            }
            let line = Line::from(Span::styled(expand_tabs(raw), style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
