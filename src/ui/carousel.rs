use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme;
use crate::animation::{spinner, AnimationId};
use crate::app::App;
use crate::content::{MediaItem, Project};
use crate::media::MediaResolver;

/// Card width in columns on wide terminals
const CARD_WIDTH: u16 = 30;
/// Columns between neighbouring cards
const CARD_SPACING: u16 = 2;

/// Render the project carousel. Returns the on-screen rect of every card
/// drawn, for hit-testing.
pub fn render(frame: &mut Frame, app: &App, area: Rect) -> Vec<(usize, Rect)> {
    let t = &app.theme;
    let mut cards = Vec::new();
    if area.height < 4 || area.width < 8 {
        return cards;
    }
    if app.catalog.is_empty() {
        let para = Paragraph::new("No projects in the catalog")
            .style(t.style_dim())
            .alignment(Alignment::Center);
        frame.render_widget(para, area);
        return cards;
    }

    // bottom row is kept for the swipe hint
    let stage = Rect {
        height: area.height - 1,
        ..area
    };
    let card_width = if app.viewport.compact {
        area.width.saturating_sub(4).max(8)
    } else {
        CARD_WIDTH.min(area.width)
    };
    let stride = (card_width + CARD_SPACING) as f32;
    let center = stage.x as f32 + stage.width as f32 / 2.0;
    let position = app.carousel.position();

    for (index, project) in app.catalog.iter().enumerate() {
        let distance = index as f32 - position;
        let params = app.card_table.sample(distance.abs());
        let left = (center + distance * stride - card_width as f32 / 2.0).round();
        let Some(rect) = clip(
            left,
            stage.y as f32 + params.offset.round(),
            card_width,
            params.rows(),
            stage,
        ) else {
            continue;
        };

        let selected = app.carousel.selected() == Some(index);
        let border_style = if selected {
            t.style_border_focused()
        } else if app.hover.is_hovered(index) {
            t.style_secondary()
        } else {
            t.style_border()
        };
        let title_style = if selected {
            t.style_selected()
        } else {
            t.style_faded(params.opacity)
        };

        let block = Block::default()
            .title(Line::from(Span::styled(
                format!(" {} ", super::truncate(&project.title, rect.width.saturating_sub(4) as usize)),
                title_style,
            )))
            .borders(Borders::ALL)
            .border_type(t.border_type)
            .border_style(border_style)
            .style(t.style_default());

        let lines = card_lines(app, project, rect.width.saturating_sub(2) as usize);
        let para = Paragraph::new(lines).block(block);
        frame.render_widget(para, rect);
        cards.push((index, rect));
    }

    let hint_area = Rect {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };
    frame.render_widget(hint(app), hint_area);
    cards
}

/// Intersect a card placed at (`left`, `top`) with the stage. Cards that
/// would be too thin to read are dropped.
fn clip(left: f32, top: f32, width: u16, height: u16, stage: Rect) -> Option<Rect> {
    let stage_right = (stage.x + stage.width) as f32;
    let x0 = left.max(stage.x as f32);
    let x1 = (left + width as f32).min(stage_right);
    if x1 - x0 < 6.0 {
        return None;
    }
    let y = top.max(stage.y as f32) as u16;
    let height = height.min((stage.y + stage.height).saturating_sub(y));
    if height < 3 {
        return None;
    }
    Some(Rect::new(x0 as u16, y, (x1 - x0) as u16, height))
}

fn card_lines(app: &App, project: &Project, width: usize) -> Vec<Line<'static>> {
    let t = &app.theme;
    let mut lines = vec![Line::from(Span::styled(
        super::truncate(&format!("{} · {}", project.year, project.role), width),
        t.style_default(),
    ))];
    if let Some(ref client) = project.client {
        lines.push(Line::from(Span::styled(
            super::truncate(client, width),
            t.style_dim(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(media_line(app, project.card_image(), app.card_width, width));
    if let Some(ref reel) = project.reel {
        lines.push(media_line(app, reel, app.card_width, width));
    }
    lines
}

/// One media reference as icon + resolved URL, or a placeholder
pub fn media_line(app: &App, item: &MediaItem, image_width: u32, width: usize) -> Line<'static> {
    let t = &app.theme;
    if item.is_missing() {
        return Line::from(vec![
            Span::styled(theme::ICON_MISSING, t.style_dim()),
            Span::styled("no media", t.style_dim()),
        ]);
    }
    let icon = if item.is_video() {
        theme::ICON_VIDEO
    } else {
        theme::ICON_IMAGE
    };
    let url = app.media.url(item, image_width);
    Line::from(vec![
        Span::styled(icon, t.style_secondary()),
        Span::styled(super::truncate(&url, width.saturating_sub(2)), t.style_dim()),
    ])
}

fn hint(app: &App) -> Paragraph<'static> {
    let t = &app.theme;
    let total = app.catalog.len();
    let counter = match (app.carousel.selected(), app.selected_project()) {
        (Some(index), Some(project)) => format!("{} / {}  {}", index + 1, total, project.title),
        _ => format!("– / {total}"),
    };
    let mut spans = vec![
        Span::styled(theme::ICON_ARROW_LEFT, t.style_dim()),
        Span::styled(format!(" {counter} "), t.style_accent()),
        Span::styled(theme::ICON_ARROW_RIGHT, t.style_dim()),
    ];
    // live drag progress; zero whenever no drag is in flight
    let progress = app.carousel.progress();
    if progress != 0.0 {
        spans.push(Span::styled(
            format!("  {:>3.0}%", progress.abs().min(1.0) * 100.0),
            t.style_dim(),
        ));
    } else if app.animation.is_active(AnimationId::SwipeHint) && !app.carousel.is_busy() {
        spans.push(Span::styled(
            format!("  {}", spinner::swipe_hint_frame(app.now_ms())),
            t.style_dim(),
        ));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}
