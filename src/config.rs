use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::content::RemoteEndpoints;
use crate::gesture::carousel::CarouselConfig;
use crate::gesture::selector::BandSelector;
use crate::gesture::surface::BandSurfaceConfig;
use crate::media::CloudinaryUrls;
use crate::projection::{ProjectionTable, VisualParams};

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time. A missing config file is never
/// fatal; this is always available as the base layer.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// folio: browse a portfolio of projects in the terminal
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "folio", version, about, long_about = None)]
pub struct CliArgs {
    /// Project catalog: a JSON array file or a directory of *.json (overrides config file)
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Fetch project pages from this site instead of the local catalog
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Log level filter (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Write logs to ~/.local/share/folio/folio.log (the TUI logs nothing otherwise)
    #[arg(long)]
    pub log: bool,

    /// Path to a custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,

    /// Target FPS for the render loop (overrides config file)
    #[arg(long)]
    pub fps: Option<u16>,

    /// Terminal width (columns) below which the compact layout is used
    #[arg(long)]
    pub compact_width: Option<u16>,

    /// Disable mouse capture
    #[arg(long)]
    pub no_mouse: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print one project as JSON
    Project { slug: String },
    /// Print every resolved media URL of a project
    Media {
        slug: String,
        /// Image width requested from the CDN
        #[arg(short, long)]
        width: Option<u32>,
    },
    /// List all projects
    Catalog,
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration: parsed from TOML, then overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub header: BandSurfaceConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Catalog file or directory; relative paths resolve against the
    /// working directory
    pub content_path: PathBuf,

    pub log_level: String,

    /// Site serving `/api/projects/...` (empty = use the local catalog)
    pub remote_base_url: String,
    pub project_path: String,
    pub media_path: String,
    pub remote_timeout_secs: u64,

    /// Terminals narrower than this get the compact layout
    pub compact_width: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Enable animations (snap runs become instant when off)
    pub animations: bool,

    /// Target FPS
    pub fps: u16,

    /// Border style: "rounded", "plain", "thick", "double"
    pub border_style: String,

    /// Pixel size of one terminal cell, used to turn mouse cells into
    /// gesture pixels
    pub cell_width_px: f32,
    pub cell_height_px: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub bg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub fg_dim: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub accent: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub accent_secondary: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub border: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub border_focused: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub error: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selected_bg: Color,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub image_transform: String,
    pub video_transform: String,
    /// Image width requested for carousel cards
    pub card_width: u32,
    /// Image width requested on the detail page
    pub detail_width: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// One row per header logo state
    pub logo: Vec<VisualParams>,
    /// Row `n` applies to cards `n` items away from the carousel position
    pub cards: Vec<VisualParams>,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        // Parse the embedded TOML; this cannot fail since we control it
        toml::from_str(DEFAULT_CONFIG_TOML)
            .expect("BUG: embedded default_config.toml is invalid TOML")
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from("content/projects.json"),
            log_level: "info".into(),
            remote_base_url: String::new(),
            project_path: crate::content::source::DEFAULT_PROJECT_PATH.into(),
            media_path: crate::content::source::DEFAULT_MEDIA_PATH.into(),
            remote_timeout_secs: 10,
            compact_width: 80,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            animations: true,
            fps: 60,
            border_style: "rounded".into(),
            cell_width_px: 8.0,
            cell_height_px: 16.0,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            fg_dim: Color::DarkGray,
            accent: Color::Cyan,
            accent_secondary: Color::Magenta,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            error: Color::Red,
            selected_bg: Color::DarkGray,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        let urls = CloudinaryUrls::default();
        Self {
            base_url: urls.base_url,
            cloud_name: urls.cloud_name,
            image_transform: urls.image_transform,
            video_transform: urls.video_transform,
            card_width: 640,
            detail_width: 1600,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        let row = |height, offset, opacity, gap| VisualParams {
            height,
            offset,
            opacity,
            gap,
        };
        Self {
            logo: vec![
                row(9.0, 0.0, 1.0, 2.0),
                row(6.0, 1.0, 1.0, 1.0),
                row(3.0, 2.0, 0.8, 1.0),
                row(1.0, 2.0, 0.6, 0.0),
            ],
            cards: vec![
                row(14.0, 0.0, 1.0, 2.0),
                row(11.0, 2.0, 0.7, 2.0),
                row(9.0, 3.0, 0.4, 1.0),
            ],
        }
    }
}

// ─── Color Deserializer ─────────────────────────────────────────────────

fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: \"{s}\"")))
}

/// Parse a color string into a ratatui Color.
/// Supports: named colors, "reset", "#RRGGBB" hex.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "reset" | "default" | "transparent" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" | "dark_gray" | "dark_grey" => Some(Color::DarkGray),
        "lightred" | "light_red" => Some(Color::LightRed),
        "lightblue" | "light_blue" => Some(Color::LightBlue),
        "lightmagenta" | "light_magenta" => Some(Color::LightMagenta),
        "lightcyan" | "light_cyan" => Some(Color::LightCyan),
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
            let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
            let b = u8::from_str_radix(&hex[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

// ─── Path Resolution & Accessors ────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/folio/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folio")
            .join("config.toml")
    }

    /// Log directory: ~/.local/share/folio/
    pub fn log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folio")
    }

    /// Tick interval from FPS
    pub fn tick_rate_ms(&self) -> u64 {
        let fps = self.appearance.fps.max(1);
        1000 / fps as u64
    }

    /// Remote endpoints, if a remote site is configured
    pub fn remote_endpoints(&self) -> Result<Option<RemoteEndpoints>> {
        let base = self.general.remote_base_url.trim();
        if base.is_empty() {
            return Ok(None);
        }
        let endpoints = RemoteEndpoints::with_paths(
            base,
            self.general.project_path.clone(),
            self.general.media_path.clone(),
        )
        .wrap_err("invalid [general] remote_base_url")?;
        Ok(Some(endpoints))
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.general.remote_timeout_secs.max(1))
    }

    pub fn media_urls(&self) -> CloudinaryUrls {
        CloudinaryUrls {
            base_url: self.media.base_url.clone(),
            cloud_name: self.media.cloud_name.clone(),
            image_transform: self.media.image_transform.clone(),
            video_transform: self.media.video_transform.clone(),
        }
    }

    /// Header surface tuning with animations applied
    pub fn header_surface(&self) -> BandSurfaceConfig {
        let mut header = self.header.clone();
        if !self.appearance.animations {
            header.duration_ms = 0;
        }
        header
    }

    /// Carousel tuning with animations applied
    pub fn carousel_surface(&self) -> CarouselConfig {
        let mut carousel = self.carousel.clone();
        if !self.appearance.animations {
            carousel.duration_ms = 0;
        }
        carousel
    }

    /// Check the loaded values for combinations the surfaces cannot work
    /// with.
    pub fn validate(&self) -> Result<()> {
        BandSelector::new(
            self.header.anchors.clone(),
            self.header.hysteresis,
            self.header.fling_threshold,
        )
        .wrap_err("invalid [header] anchors")?;

        for (section, threshold) in [
            ("header", self.header.drag_threshold),
            ("carousel", self.carousel.drag_threshold),
        ] {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(eyre!(
                    "[{section}] drag_threshold must be positive, got {threshold}"
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.carousel.commit_progress) {
            return Err(eyre!(
                "[carousel] commit_progress must lie in [0, 1], got {}",
                self.carousel.commit_progress
            ));
        }

        ProjectionTable::new(self.projection.logo.clone())
            .wrap_err("[[projection.logo]] needs at least one row")?;
        ProjectionTable::new(self.projection.cards.clone())
            .wrap_err("[[projection.cards]] needs at least one row")?;
        if self.projection.logo.len() != self.header.anchors.len() {
            return Err(eyre!(
                "[[projection.logo]] has {} rows but [header] defines {} anchors",
                self.projection.logo.len(),
                self.header.anchors.len()
            ));
        }

        self.remote_endpoints()?;

        if self.appearance.cell_width_px <= 0.0 || self.appearance.cell_height_px <= 0.0 {
            return Err(eyre!("[appearance] cell sizes must be positive"));
        }
        Ok(())
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If the config file doesn't exist, create directory tree + write defaults
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
/// 5. Validate
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&config_path, DEFAULT_CONFIG_TOML).wrap_err_with(|| {
            format!(
                "Failed to write default config to {}",
                config_path.display()
            )
        })?;
        info!("Created default config at {}", config_path.display());
    }

    let toml_str = std::fs::read_to_string(&config_path)
        .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;

    let mut config = parse(&toml_str).wrap_err_with(|| {
        format!(
            "Failed to parse config at {}.\n\
             Delete the file to regenerate defaults, or run:\n  \
             folio --print-default-config > {:?}",
            config_path.display(),
            config_path
        )
    })?;

    apply_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn parse(toml_str: &str) -> Result<Config> {
    Ok(toml::from_str(toml_str)?)
}

// ── CLI overrides ───────────────────────────────────────────────────
fn apply_overrides(config: &mut Config, cli: &CliArgs) {
    if let Some(ref path) = cli.content {
        config.general.content_path = path.clone();
    }
    if let Some(ref url) = cli.remote {
        config.general.remote_base_url = url.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(fps) = cli.fps {
        config.appearance.fps = fps;
    }
    if let Some(width) = cli.compact_width {
        config.general.compact_width = width;
    }
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::easing::Easing;

    #[test]
    fn embedded_default_parses_and_validates() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.header.drag_threshold, 150.0);
        assert_eq!(config.header.duration_ms, 400);
        assert_eq!(config.carousel.drag_threshold, 200.0);
        assert_eq!(config.carousel.duration_ms, 300);
        assert_eq!(config.projection.logo.len(), 4);
    }

    #[test]
    fn embedded_default_matches_code_defaults() {
        let config = Config::default();
        assert_eq!(config.header, BandSurfaceConfig::default());
        assert_eq!(config.carousel, CarouselConfig::default());
        assert_eq!(config.projection.logo, ProjectionConfig::default().logo);
        assert_eq!(config.projection.cards, ProjectionConfig::default().cards);
        assert_eq!(config.media_urls(), CloudinaryUrls::default());
    }

    #[test]
    fn partial_file_falls_back_to_section_defaults() {
        let config = parse(
            r##"
            [header]
            drag_threshold = 90.0
            easing = "quintic-out"

            [theme]
            accent = "#ff8800"
            "##,
        )
        .unwrap();
        assert_eq!(config.header.drag_threshold, 90.0);
        assert_eq!(config.header.easing, Easing::QuinticOut);
        assert_eq!(config.header.anchors, vec![0.0, 0.33, 0.66, 1.0]);
        assert_eq!(config.theme.accent, Color::Rgb(0xff, 0x88, 0x00));
        assert_eq!(config.theme.fg, Color::White);
        assert_eq!(config.carousel.fling_tiers.len(), 2);
    }

    #[test]
    fn cli_overrides_win() {
        let mut config = Config::default();
        let cli = CliArgs {
            content: Some(PathBuf::from("/tmp/x.json")),
            remote: Some("https://example.org".into()),
            fps: Some(24),
            compact_width: Some(100),
            ..CliArgs::default()
        };
        apply_overrides(&mut config, &cli);
        assert_eq!(config.general.content_path, PathBuf::from("/tmp/x.json"));
        assert_eq!(config.tick_rate_ms(), 41);
        assert_eq!(config.general.compact_width, 100);
        let endpoints = config.remote_endpoints().unwrap().unwrap();
        assert_eq!(
            endpoints.project_url("kin").as_str(),
            "https://example.org/api/projects/kin"
        );
    }

    #[test]
    fn no_remote_by_default() {
        assert!(Config::default().remote_endpoints().unwrap().is_none());
    }

    #[test]
    fn validate_rejects_bad_tables() {
        let mut config = Config::default();
        config.header.anchors = vec![0.0, 0.7, 0.5, 1.0];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.projection.cards.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.projection.logo.pop();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.carousel.drag_threshold = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.remote_base_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn disabled_animations_make_runs_instant() {
        let mut config = Config::default();
        config.appearance.animations = false;
        assert_eq!(config.header_surface().duration_ms, 0);
        assert_eq!(config.carousel_surface().duration_ms, 0);
    }

    #[test]
    fn parse_color_accepts_names_and_hex() {
        assert_eq!(parse_color("Dark_Gray"), Some(Color::DarkGray));
        assert_eq!(parse_color("#0a0b0c"), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(parse_color("#zzz"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }
}
