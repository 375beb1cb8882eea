use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command("Del", false)
        }
        KeyCode::Char('q') => app.command("Del", false),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Home => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        KeyCode::Enter => app.look_selected(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_selected(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_selected(),
        KeyCode::Char('x') => app.execute_selected(),

        KeyCode::Char('g') => app.command("Get", false),
        KeyCode::Char('a') => app.command("All", false),
        KeyCode::Char('u') | KeyCode::Backspace => app.command("Up", false),
        KeyCode::Char('c') => app.command("Cd", true),
        KeyCode::Char('w') => app.command("Win", true),
        KeyCode::Char('n') => app.command("Xplor", true),
        _ => {}
    }
}

/// Handle a mouse event: left click selects, right click looks, middle click
/// executes.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Right) if mouse.row < app.body_area.y => {
            let window_name = app.session.window_name();
            app.tag_look(&window_name);
        }
        MouseEventKind::Down(button) => {
            if !app.select_row(mouse.row) {
                return;
            }
            match button {
                MouseButton::Left => {}
                MouseButton::Right => app.look_selected(),
                MouseButton::Middle => app.execute_selected(),
            }
        }
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
