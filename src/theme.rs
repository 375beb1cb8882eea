//! Built-in color palettes for the terminal front end.

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Buffer body
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub dir_fg: Color,
    pub file_fg: Color,
    pub hidden_fg: Color,

    // Tag line and status bar
    pub tag_bg: Color,
    pub tag_fg: Color,
    pub status_fg: Color,
    pub border_fg: Color,

    // Semantic colors
    pub error_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        selected_bg: Color::Rgb(69, 71, 90),     // #45475a (surface1)
        selected_fg: Color::Rgb(205, 214, 244),  // #cdd6f4 (text)
        dir_fg: Color::Rgb(137, 180, 250),       // #89b4fa (blue)
        file_fg: Color::Rgb(205, 214, 244),      // #cdd6f4
        hidden_fg: Color::Rgb(108, 112, 134),    // #6c7086 (overlay0)

        tag_bg: Color::Rgb(49, 50, 68),          // #313244 (surface0)
        tag_fg: Color::Rgb(205, 214, 244),
        status_fg: Color::Rgb(205, 214, 244),
        border_fg: Color::Rgb(88, 91, 112),      // #585b70 (surface2)

        error_fg: Color::Rgb(243, 139, 168),     // #f38ba8 (red)
        success_fg: Color::Rgb(166, 227, 161),   // #a6e3a1 (green)
        info_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        dim_fg: Color::Rgb(108, 112, 134),       // #6c7086
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        selected_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface1)
        selected_fg: Color::Rgb(76, 79, 105),    // #4c4f69 (text)
        dir_fg: Color::Rgb(30, 102, 245),        // #1e66f5 (blue)
        file_fg: Color::Rgb(76, 79, 105),
        hidden_fg: Color::Rgb(156, 160, 176),    // #9ca0b0 (overlay0)

        tag_bg: Color::Rgb(230, 233, 239),       // #e6e9ef (surface0)
        tag_fg: Color::Rgb(76, 79, 105),
        status_fg: Color::Rgb(76, 79, 105),
        border_fg: Color::Rgb(172, 176, 190),    // #acb0be (surface2)

        error_fg: Color::Rgb(210, 15, 57),       // #d20f39 (red)
        success_fg: Color::Rgb(64, 160, 43),     // #40a02b (green)
        info_fg: Color::Rgb(30, 102, 245),
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

/// Palette for a configured scheme name; unknown names get the dark palette.
pub fn resolve_theme(scheme: Option<&str>) -> ThemeColors {
    match scheme.unwrap_or("dark") {
        "light" => light_theme(),
        _ => dark_theme(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scheme_is_dark() {
        assert_eq!(resolve_theme(None).dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn light_scheme_resolves() {
        assert_eq!(resolve_theme(Some("light")).dir_fg, Color::Rgb(30, 102, 245));
    }

    #[test]
    fn unknown_scheme_falls_back_to_dark() {
        assert_eq!(
            resolve_theme(Some("neon")).error_fg,
            dark_theme().error_fg
        );
    }
}
