use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::theme;
use crate::app::App;
use crate::projection::VisualParams;

/// Rows taken by the header for the given logo projection: the logo itself,
/// its top offset, the gap under it and the two border rows.
pub fn height(logo: &VisualParams) -> u16 {
    logo.rows()
        .max(1)
        .saturating_add(logo.offset.round().max(0.0) as u16)
        .saturating_add(logo.gap.round().max(0.0) as u16)
        .saturating_add(2)
}

/// Render the morphing site header
pub fn render(frame: &mut Frame, app: &App, logo: &VisualParams, area: Rect) {
    let t = &app.theme;
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_type(t.border_type)
        .border_style(t.style_border())
        .style(t.style_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = t.style_faded(logo.opacity);
    let top_pad = logo.offset.round().max(0.0) as usize;
    let mut lines: Vec<Line> = vec![Line::from(""); top_pad];
    for row in logo_rows(logo.rows()) {
        lines.push(Line::from(Span::styled(row, style)));
    }

    // Tagline shows only while the logo has room for it
    if logo.rows() >= 3 && logo.gap >= 1.0 {
        lines.push(Line::from(Span::styled(
            format!("{} projects", app.catalog.len()),
            t.style_dim(),
        )));
    }

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);
}

/// Logo art for a given height in rows
fn logo_rows(rows: u16) -> Vec<&'static str> {
    match rows {
        0..=1 => vec![theme::LOGO_SMALL],
        2..=4 => vec![theme::LOGO_MEDIUM],
        _ => theme::LOGO_LARGE.to_vec(),
    }
}
