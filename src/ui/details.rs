use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::carousel::media_line;
use crate::animation::spinner;
use crate::app::App;
use crate::content::{MediaItem, Project};

/// Render one project page, scrolled by `scroll` lines
pub fn render(frame: &mut Frame, app: &App, project: &Project, scroll: u16, area: Rect) {
    let t = &app.theme;
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", project.title),
            t.style_accent_bold(),
        )))
        .borders(Borders::ALL)
        .border_type(t.border_type)
        .border_style(t.style_border_focused())
        .style(t.style_default());
    let width = block.inner(area).width as usize;

    let lines = project_lines(app, project, width);
    // never scroll past the last line
    let max_scroll = (lines.len() as u16).saturating_sub(1);
    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(max_scroll), 0));
    frame.render_widget(para, area);
}

fn project_lines(app: &App, project: &Project, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        detail_line(app, "  Year", &project.year),
        detail_line(app, "  Role", &project.role),
    ];
    if let Some(ref client) = project.client {
        lines.push(detail_line(app, "  Client", client));
    }

    lines.push(Line::from(""));
    lines.push(section(app, "Cover"));
    lines.push(indented(media_line(app, &project.cover, app.detail_width, width.saturating_sub(2))));
    if let Some(ref reel) = project.reel {
        lines.push(section(app, "Reel"));
        lines.push(indented(media_line(app, reel, app.detail_width, width.saturating_sub(2))));
    }

    for (i, element) in project.elements.iter().enumerate() {
        lines.push(Line::from(""));
        let title = element
            .title
            .clone()
            .unwrap_or_else(|| format!("Part {}", i + 1));
        lines.push(section(app, &title));
        push_media(app, &mut lines, "profile", &element.profile, width);
        push_media(app, &mut lines, "detail", &element.detail, width);
        push_media(app, &mut lines, "gallery", &element.gallery, width);
    }
    lines
}

fn push_media(
    app: &App,
    lines: &mut Vec<Line<'static>>,
    label: &str,
    items: &[MediaItem],
    width: usize,
) {
    if items.is_empty() {
        return;
    }
    lines.push(Line::from(Span::styled(
        format!("    {label}"),
        app.theme.style_dim(),
    )));
    for item in items {
        let mut line = indented(media_line(app, item, app.detail_width, width.saturating_sub(6)));
        if let Some(ref alt) = item.alt {
            line.spans.push(Span::styled(format!("  {alt}"), app.theme.style_dim()));
        }
        lines.push(line);
    }
}

fn section(app: &App, title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  ── {title} ──"),
        app.theme.style_accent(),
    ))
}

fn indented(mut line: Line<'static>) -> Line<'static> {
    line.spans.insert(0, Span::raw("    "));
    line
}

/// Build a key-value detail line (owns its data)
fn detail_line(app: &App, label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), app.theme.style_dim()),
        Span::styled(value.to_string(), app.theme.style_default()),
    ])
}

/// Spinner shown while a project page is fetched
pub fn render_loading(frame: &mut Frame, app: &App, slug: &str, area: Rect) {
    let t = &app.theme;
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner::spinner_frame(app.now_ms())),
                t.style_accent(),
            ),
            Span::styled("Loading ", t.style_dim()),
            Span::styled(slug.to_string(), t.style_accent()),
            Span::styled("…", t.style_dim()),
        ]),
    ];
    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, area);
}

pub fn render_not_found(frame: &mut Frame, app: &App, slug: &str, message: &str, area: Rect) {
    let t = &app.theme;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No project called \"{slug}\""),
            t.style_error(),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), t.style_dim())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", t.style_dim()),
            Span::styled("Esc", t.style_key_hint()),
            Span::styled(" to go back", t.style_dim()),
        ]),
    ];
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}
