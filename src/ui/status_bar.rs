use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Page};
use crate::ui::theme::Theme;

/// Render the bottom status bar with context-sensitive keybinding hints
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let hints = if app.show_help {
        help_hints(t)
    } else {
        match &app.page {
            Page::Gallery if app.carousel.selected().is_some() => selected_hints(t),
            Page::Gallery => gallery_hints(t),
            Page::Loading { .. } => vec![
                Span::styled("Fetching… ", t.style_dim()),
                key(t, "Esc"),
                desc(t, "Back"),
            ],
            Page::Detail { .. } => detail_hints(t),
            Page::NotFound { .. } => vec![key(t, "Esc"), desc(t, "Back")],
        }
    };

    let para = Paragraph::new(Line::from(hints)).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn gallery_hints(t: &Theme) -> Vec<Span<'static>> {
    vec![
        key(t, "←→/hl"),
        desc(t, "Browse "),
        key(t, "+/-"),
        desc(t, "Logo "),
        key(t, "?"),
        desc(t, "Help "),
        key(t, "q"),
        desc(t, "Quit"),
    ]
}

fn selected_hints(t: &Theme) -> Vec<Span<'static>> {
    vec![
        key(t, "←→/hl"),
        desc(t, "Browse "),
        key(t, "Enter"),
        desc(t, "Open "),
        key(t, "Esc"),
        desc(t, "Collapse "),
        key(t, "?"),
        desc(t, "Help "),
        key(t, "q"),
        desc(t, "Quit"),
    ]
}

fn detail_hints(t: &Theme) -> Vec<Span<'static>> {
    vec![
        key(t, "↑↓/jk"),
        desc(t, "Scroll "),
        key(t, "PgUp/PgDn"),
        desc(t, "Page "),
        key(t, "Esc"),
        desc(t, "Back "),
        key(t, "q"),
        desc(t, "Quit"),
    ]
}

fn help_hints(t: &Theme) -> Vec<Span<'static>> {
    vec![key(t, "?"), desc(t, "Close "), key(t, "Esc"), desc(t, "Close")]
}

fn key(t: &Theme, k: &'static str) -> Span<'static> {
    Span::styled(format!(" [{k}] "), t.style_key_hint())
}

fn desc(t: &Theme, d: &'static str) -> Span<'static> {
    Span::styled(d, t.style_key_desc())
}
