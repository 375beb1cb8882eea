use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " ⏎:look  x:exec  g:Get  a:All  u:Up  c:Cd  w:Win  n:Xplor  q:Del ";

/// Status bar widget that displays the selected path, session info, key
/// hints, or a status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

fn width_of(s: &str) -> usize {
    s.chars().count()
}

/// Keep the last `budget` characters, marking the cut with `...`.
fn truncate_start(s: &str, budget: usize) -> String {
    let len = width_of(s);
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{tail}")
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default().fg(self.theme.success_fg)
            };

            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);

            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [path] [info] [key_hints]
        let hints_len = width_of(KEY_HINTS);
        let remaining = width.saturating_sub(hints_len);

        let info_len = width_of(self.info);
        let path_budget = remaining.saturating_sub(info_len).saturating_sub(1);
        let path_display = truncate_start(self.path_str, path_budget);

        let info_display: String = self
            .info
            .chars()
            .take(remaining.saturating_sub(width_of(&path_display)))
            .collect();

        let gap = remaining
            .saturating_sub(width_of(&path_display))
            .saturating_sub(width_of(&info_display));

        let path_style = Style::default().fg(self.theme.status_fg);
        let info_style = Style::default().fg(self.theme.info_fg);
        let hints_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);

        let line = Line::from(vec![
            Span::styled(path_display, path_style),
            Span::raw(" ".repeat(gap)),
            Span::styled(info_display, info_style),
            Span::styled(KEY_HINTS, hints_style),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use ratatui::style::Color;

    fn test_theme() -> ThemeColors {
        theme::dark_theme()
    }

    fn content(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_basic_widget_creation() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/home/user/file.txt", "2 expanded", &tc);
        assert_eq!(widget.path_str, "/home/user/file.txt");
        assert_eq!(widget.info, "2 expanded");
        assert!(widget.status_message.is_none());
        assert!(!widget.is_error);
    }

    #[test]
    fn test_status_message_success() {
        let tc = test_theme();
        let widget =
            StatusBarWidget::new("/path", "info", &tc).status_message("sent /tmp/a.txt", false);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(content(&buf, 80).contains("sent /tmp/a.txt"));
        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.fg, Color::Rgb(166, 227, 161));
    }

    #[test]
    fn test_status_message_error() {
        let tc = test_theme();
        let widget =
            StatusBarWidget::new("/path", "info", &tc).status_message("Permission denied", true);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(content(&buf, 80).contains("Permission denied"));
        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.bg, Color::Rgb(243, 139, 168));
        assert_eq!(cell.fg, Color::Rgb(205, 214, 244));
    }

    #[test]
    fn test_long_multibyte_message_is_cut() {
        let tc = test_theme();
        let msg = "ä".repeat(100);
        let widget = StatusBarWidget::new("/path", "info", &tc).status_message(&msg, true);

        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert_eq!(content(&buf, 10), "ä".repeat(10));
    }

    #[test]
    fn test_normal_bar_rendering() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/home/user/project", "1 expanded", &tc);

        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let text = content(&buf, 120);
        assert!(text.contains("/home/user/project"));
        assert!(text.contains("1 expanded"));
        assert!(text.contains("g:Get"));
        assert!(text.contains("q:Del"));
    }

    #[test]
    fn test_long_path_keeps_its_end() {
        assert_eq!(truncate_start("/a/very/long/path", 10), "...ng/path");
        assert_eq!(truncate_start("/short", 10), "/short");
        assert_eq!(truncate_start("/short", 2), "/s");
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("/path", "info", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
