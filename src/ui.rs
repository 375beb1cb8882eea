use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::body::BodyWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tag::TagWidget;

/// Render the application UI: tag line, body, status bar.
pub fn render(app: &mut App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let window_name = app.session.window_name();
    frame.render_widget(TagWidget::new(&window_name, &app.theme), chunks[0]);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(app.theme.border_fg));
    let body_area = block.inner(chunks[1]);
    app.body_area = body_area;
    app.update_scroll(body_area.height as usize);

    let selected = app.selected_line();
    let body = BodyWidget::new(app.session.editor().text(), &app.theme)
        .selected(Some(selected))
        .scroll(app.scroll_offset)
        .block(block);
    frame.render_widget(body, chunks[1]);

    let path_str = app
        .selected_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let info = app.status_info();
    let mut status = StatusBarWidget::new(&path_str, &info, &app.theme);
    if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg, app.status_is_error);
    }
    frame.render_widget(status, chunks[2]);
}
