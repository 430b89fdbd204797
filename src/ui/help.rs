use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Keybinding entries: (key, description). An empty key starts a section.
const KEYBINDINGS: &[(&str, &str)] = &[
    ("", "Gallery"),
    ("← / h", "Previous project"),
    ("→ / l", "Next project"),
    ("g / G", "First / last project"),
    ("Enter", "Open selected project"),
    ("Esc", "Collapse selection"),
    ("+ / ↓ / j", "Shrink logo"),
    ("- / ↑ / k", "Grow logo"),
    ("", "Project page"),
    ("↑↓ / jk", "Scroll"),
    ("PgUp / PgDn", "Scroll a page"),
    ("Esc", "Back to gallery"),
    ("", "Mouse"),
    ("drag ↕", "Morph the header"),
    ("drag ↔", "Swipe the carousel"),
    ("click", "Select / open a card"),
    ("", ""),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

/// Render the help overlay
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let width = 48_u16.min(area.width.saturating_sub(4));
    let height = (KEYBINDINGS.len() as u16 + 5).min(area.height.saturating_sub(2));

    let dialog = super::centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Line::from(Span::styled(" Keybindings ", t.style_accent_bold())))
        .borders(Borders::ALL)
        .border_type(t.border_type)
        .border_style(t.style_accent())
        .style(t.style_default());

    let mut lines: Vec<Line> = Vec::new();
    for (key, desc) in KEYBINDINGS {
        if key.is_empty() {
            lines.push(Line::from(""));
            if !desc.is_empty() {
                lines.push(Line::from(Span::styled(format!(" {desc}"), t.style_secondary())));
            }
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", key), t.style_key_hint()),
            Span::styled(*desc, t.style_default()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", t.style_dim()),
        Span::styled("?", t.style_key_hint()),
        Span::styled(" or ", t.style_dim()),
        Span::styled("Esc", t.style_key_hint()),
        Span::styled(" to close", t.style_dim()),
    ]));

    let para = Paragraph::new(lines).block(block);
    frame.render_widget(para, dialog);
}
