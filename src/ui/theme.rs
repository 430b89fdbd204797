use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::config::{AppearanceConfig, ThemeConfig};

// ─── Glyphs ──────────────────────────────────────────────────────────────

pub const ICON_IMAGE: &str = "▣ ";
pub const ICON_VIDEO: &str = "▶ ";
pub const ICON_MISSING: &str = "▢ ";
pub const ICON_ARROW_LEFT: &str = "‹";
pub const ICON_ARROW_RIGHT: &str = "›";

/// Site name rendered by the header at each logo size, largest first
pub const LOGO_LARGE: &[&str] = &[
    "█▀▀ █▀█ █   █ █▀█",
    "█▀  █ █ █   █ █ █",
    "▀   ▀▀▀ ▀▀▀ ▀ ▀▀▀",
];
pub const LOGO_MEDIUM: &str = "F O L I O";
pub const LOGO_SMALL: &str = "folio";

// ─── Theme ───────────────────────────────────────────────────────────────

/// Resolved colors plus the configured border type
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,
    pub accent: Color,
    pub accent_secondary: Color,
    pub border: Color,
    pub border_focused: Color,
    pub error: Color,
    pub selected_bg: Color,
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default(), &AppearanceConfig::default())
    }
}

impl Theme {
    pub fn from_config(colors: &ThemeConfig, appearance: &AppearanceConfig) -> Self {
        Self {
            bg: colors.bg,
            fg: colors.fg,
            fg_dim: colors.fg_dim,
            accent: colors.accent,
            accent_secondary: colors.accent_secondary,
            border: colors.border,
            border_focused: colors.border_focused,
            error: colors.error,
            selected_bg: colors.selected_bg,
            border_type: parse_border_type(&appearance.border_style),
        }
    }

    // ─── Style Constructors ──────────────────────────────────────────────

    pub fn style_default(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn style_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    pub fn style_accent(&self) -> Style {
        Style::default().fg(self.accent).bg(self.bg)
    }

    pub fn style_accent_bold(&self) -> Style {
        self.style_accent().add_modifier(Modifier::BOLD)
    }

    pub fn style_secondary(&self) -> Style {
        Style::default().fg(self.accent_secondary).bg(self.bg)
    }

    pub fn style_selected(&self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }

    pub fn style_border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    pub fn style_border_focused(&self) -> Style {
        Style::default().fg(self.border_focused).bg(self.bg)
    }

    pub fn style_key_hint(&self) -> Style {
        self.style_accent_bold()
    }

    pub fn style_key_desc(&self) -> Style {
        self.style_dim()
    }

    /// Terminals have no alpha; opacity picks between emphasis levels.
    pub fn style_faded(&self, opacity: f32) -> Style {
        if opacity >= 0.75 {
            self.style_accent_bold()
        } else if opacity >= 0.45 {
            self.style_default()
        } else {
            self.style_dim()
        }
    }
}

fn parse_border_type(s: &str) -> BorderType {
    match s.trim().to_lowercase().as_str() {
        "plain" => BorderType::Plain,
        "thick" => BorderType::Thick,
        "double" => BorderType::Double,
        _ => BorderType::Rounded,
    }
}
