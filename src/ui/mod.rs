pub mod carousel;
pub mod details;
pub mod header;
pub mod help;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::{App, Page};

/// Top-level draw function: header + active page + status bar, then overlays
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    // Project pages pin the header to its smallest logo state
    let logo = if app.page == Page::Gallery {
        app.logo_table.sample(app.header.position())
    } else {
        app.logo_table.row(app.logo_table.len() - 1)
    };
    let header_height = header::height(&logo);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(0),    // Page content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    app.layout.header = chunks[0];
    app.layout.body = chunks[1];

    header::render(f, app, &logo, chunks[0]);
    let cards = match &app.page {
        Page::Gallery => carousel::render(f, app, chunks[1]),
        Page::Loading { slug } => {
            details::render_loading(f, app, slug, chunks[1]);
            Vec::new()
        }
        Page::Detail { project, scroll } => {
            details::render(f, app, project, *scroll, chunks[1]);
            Vec::new()
        }
        Page::NotFound { slug, message } => {
            details::render_not_found(f, app, slug, message, chunks[1]);
            Vec::new()
        }
    };
    app.layout.cards = cards;
    status_bar::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app, area);
    }
    if let Some(ref msg) = app.toast_message {
        render_toast(f, app, msg);
    }
}

/// A fixed-size rect centered in `area`
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Cut `s` to at most `width` terminal columns, marking the cut with `…`
pub fn truncate(s: &str, width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    if width > 0 {
        out.push('…');
    }
    out
}

/// Render a temporary toast notification at the top-right
fn render_toast(f: &mut Frame, app: &App, message: &str) {
    let theme = &app.theme;
    let area = f.area();
    if area.width < 8 || area.height < 3 {
        return;
    }
    let width = (unicode_width::UnicodeWidthStr::width(message) as u16 + 6).min(area.width - 4);
    let x = area.width.saturating_sub(width + 2);
    let toast_area = Rect::new(x, 1, width, 3);

    f.render_widget(Clear, toast_area);

    let (style, icon) = if app.toast_is_error {
        (theme.style_error(), " ✗ ")
    } else {
        (theme.style_accent(), " ✓ ")
    };

    let text = Paragraph::new(Line::from(vec![
        Span::styled(icon, style),
        Span::styled(message.to_string(), theme.style_default()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(style),
    );

    f.render_widget(text, toast_area);
}
