use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::session::TAG_COMMANDS;
use crate::theme::ThemeColors;

/// The window tag: window name followed by the available commands.
pub struct TagWidget<'a> {
    window_name: &'a str,
    theme: &'a ThemeColors,
}

impl<'a> TagWidget<'a> {
    pub fn new(window_name: &'a str, theme: &'a ThemeColors) -> Self {
        Self { window_name, theme }
    }
}

impl<'a> Widget for TagWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let base = Style::default().bg(self.theme.tag_bg).fg(self.theme.tag_fg);
        let mut spans = vec![
            Span::styled(self.window_name, base.add_modifier(Modifier::BOLD)),
            Span::styled(" Del", base),
        ];
        for command in TAG_COMMANDS {
            spans.push(Span::styled(format!(" {command}"), base));
        }

        buf.set_style(area, base);
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
