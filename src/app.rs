use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::animation::clock::FrameClock;
use crate::animation::{AnimationId, AnimationState};
use crate::config::Config;
use crate::content::{Catalog, Project, ProjectSource};
use crate::context::{HoverContext, ViewportContext};
use crate::error::FolioResult;
use crate::event::Event;
use crate::gesture::carousel::ReleaseOutcome;
use crate::gesture::{BandSurface, CarouselSurface, GestureSample, PointerId};
use crate::media::CloudinaryUrls;
use crate::projection::ProjectionTable;
use crate::ui::theme::Theme;

/// Mouse pointers are always pointer 0; the wheel has its own id
const MOUSE_POINTER: PointerId = 0;

/// How long a toast stays on screen
const TOAST_MS: u64 = 3_000;

// ── Page enum ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Header + carousel
    Gallery,
    /// Waiting for a lazily fetched project
    Loading { slug: String },
    /// One project page
    Detail { project: Box<Project>, scroll: u16 },
    /// The requested project does not exist or could not be fetched
    NotFound { slug: String, message: String },
}

/// Surface owning the active mouse drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Header,
    Carousel,
}

/// Screen regions from the last draw, used for hit-testing mouse events
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    pub header: Rect,
    pub body: Rect,
    pub cards: Vec<(usize, Rect)>,
}

impl LayoutState {
    pub fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        let position = Position::new(column, row);
        self.cards
            .iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|(index, _)| *index)
    }
}

// ── Application State ─────────────────────────────────────────────────

pub struct App {
    pub page: Page,
    pub show_help: bool,
    pub should_quit: bool,
    pub theme: Theme,

    // Content
    pub catalog: Arc<Catalog>,
    pub source: ProjectSource,
    pub media: CloudinaryUrls,
    pub card_width: u32,
    pub detail_width: u32,

    // Gesture surfaces and their frame clock
    pub frame_clock: FrameClock,
    pub header: BandSurface,
    pub carousel: CarouselSurface,
    pub logo_table: ProjectionTable,
    pub card_table: ProjectionTable,

    // View context
    pub viewport: ViewportContext,
    pub hover: HoverContext,
    pub layout: LayoutState,
    pub animation: AnimationState,
    compact_width: u16,
    cell_width_px: f32,
    cell_height_px: f32,
    drag: Option<DragTarget>,

    // Toast notification
    pub toast_message: Option<String>,
    pub toast_is_error: bool,
    toast_until_ms: u64,

    // Event sender for async fetch results
    event_tx: Option<mpsc::UnboundedSender<Event>>,
}

impl App {
    pub fn new(
        config: &Config,
        catalog: Arc<Catalog>,
        source: ProjectSource,
        event_tx: Option<mpsc::UnboundedSender<Event>>,
    ) -> FolioResult<Self> {
        let frame_clock = FrameClock::new();
        let header = BandSurface::new(config.header_surface(), Rc::new(frame_clock.clone()))?;
        let carousel = CarouselSurface::new(
            config.carousel_surface(),
            catalog.len(),
            Rc::new(frame_clock.clone()),
        );
        let mut animation = AnimationState::default();
        animation.start(AnimationId::SwipeHint);

        Ok(Self {
            page: Page::Gallery,
            show_help: false,
            should_quit: false,
            theme: Theme::from_config(&config.theme, &config.appearance),

            catalog,
            source,
            media: config.media_urls(),
            card_width: config.media.card_width,
            detail_width: config.media.detail_width,

            frame_clock,
            header,
            carousel,
            logo_table: ProjectionTable::new(config.projection.logo.clone())?,
            card_table: ProjectionTable::new(config.projection.cards.clone())?,

            viewport: ViewportContext::default(),
            hover: HoverContext::default(),
            layout: LayoutState::default(),
            animation,
            compact_width: config.general.compact_width,
            cell_width_px: config.appearance.cell_width_px,
            cell_height_px: config.appearance.cell_height_px,
            drag: None,

            toast_message: None,
            toast_is_error: false,
            toast_until_ms: 0,

            event_tx,
        })
    }

    /// Latest known clock time (ms since startup)
    pub fn now_ms(&self) -> u64 {
        self.animation.now_ms
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.carousel
            .selected()
            .and_then(|index| self.catalog.by_index(index))
    }

    /// True while anything on screen is moving and the loop should keep
    /// drawing every tick
    pub fn is_animating(&self) -> bool {
        self.header.is_busy()
            || self.carousel.is_busy()
            || self.animation.is_active(AnimationId::Loading)
    }

    pub fn show_toast(&mut self, message: &str, is_error: bool) {
        self.toast_message = Some(message.to_string());
        self.toast_is_error = is_error;
        self.toast_until_ms = self.now_ms() + TOAST_MS;
    }

    // ── Event dispatch ────────────────────────────────────────────────

    /// Handle events from the event loop
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse, now_ms) => self.handle_mouse(mouse, now_ms),
            Event::Tick(now_ms) => self.on_tick(now_ms),
            Event::Resize(width, height) => self.resize(width, height),
            Event::ProjectLoaded(project) => self.on_project_loaded(*project),
            Event::ProjectFailed { slug, message } => self.on_project_failed(slug, message),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let viewport = ViewportContext::new(width, height, self.compact_width);
        if viewport.compact != self.viewport.compact {
            info!(width, compact = viewport.compact, "layout changed");
        }
        self.viewport = viewport;
    }

    fn on_tick(&mut self, now_ms: u64) {
        self.animation.tick(now_ms);
        let now_ms = self.animation.now_ms;
        self.frame_clock.drain_frame_callbacks(now_ms);
        self.header.settle(now_ms);

        if self.toast_message.is_some() && now_ms >= self.toast_until_ms {
            self.toast_message = None;
        }
    }

    // ── Keys ──────────────────────────────────────────────────────────

    /// Handle a key event, dispatching to the appropriate handler
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.cancel_drag();
                self.show_help = !self.show_help;
                return;
            }
            KeyCode::Esc if self.show_help => {
                self.show_help = false;
                return;
            }
            _ => {}
        }
        if self.show_help {
            return;
        }

        match self.page {
            Page::Gallery => self.handle_gallery_key(key),
            Page::Detail { .. } => self.handle_detail_key(key),
            Page::Loading { .. } | Page::NotFound { .. } => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Backspace) {
                    self.back_to_gallery();
                }
            }
        }
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) {
        let now = self.now_ms();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.carousel.previous(now),
            KeyCode::Right | KeyCode::Char('l') => self.carousel.next(now),
            KeyCode::Home | KeyCode::Char('g') => self.carousel.select(0, now),
            // select clamps to the last item
            KeyCode::End | KeyCode::Char('G') => self.carousel.select(i32::MAX, now),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Down | KeyCode::Char('j') => {
                self.header.step(1, now)
            }
            KeyCode::Char('-') | KeyCode::Up | KeyCode::Char('k') => self.header.step(-1, now),
            KeyCode::Enter => {
                if let Some(index) = self.carousel.selected() {
                    self.open_project(index);
                }
            }
            KeyCode::Esc => {
                if self.carousel.selected().is_some() {
                    self.carousel.collapse(now);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.back_to_gallery(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_detail(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_detail(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_detail(10),
            KeyCode::PageUp => self.scroll_detail(-10),
            KeyCode::Home | KeyCode::Char('g') => {
                if let Page::Detail { scroll, .. } = &mut self.page {
                    *scroll = 0;
                }
            }
            _ => {}
        }
    }

    fn scroll_detail(&mut self, delta: i32) {
        if let Page::Detail { scroll, .. } = &mut self.page {
            *scroll = (*scroll as i32 + delta).clamp(0, u16::MAX as i32) as u16;
        }
    }

    fn back_to_gallery(&mut self) {
        self.cancel_drag();
        self.page = Page::Gallery;
        self.animation.stop(AnimationId::Loading);
    }

    // ── Mouse ─────────────────────────────────────────────────────────

    /// Map terminal mouse events onto the gesture surfaces.
    ///
    /// Vertical drags over the header drive the logo morph, horizontal drags
    /// over the body drive the carousel. Cell coordinates are converted to
    /// pixels so that drag thresholds and fling velocities keep their units.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now_ms: u64) {
        self.animation.now_ms = self.animation.now_ms.max(now_ms);
        let now_ms = self.animation.now_ms;
        let (column, row) = (mouse.column, mouse.row);

        if self.show_help {
            return;
        }
        if let Page::Detail { .. } = self.page {
            match mouse.kind {
                MouseEventKind::ScrollDown => self.scroll_detail(3),
                MouseEventKind::ScrollUp => self.scroll_detail(-3),
                _ => {}
            }
            return;
        }
        if self.page != Page::Gallery {
            return;
        }

        let vertical = self.vertical_sample(row, now_ms);
        let horizontal = self.horizontal_sample(column, now_ms);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(column, row);
                if self.layout.header.contains(position) {
                    self.drag = Some(DragTarget::Header);
                    self.header.pointer_down(MOUSE_POINTER, vertical);
                } else if self.layout.body.contains(position) {
                    self.drag = Some(DragTarget::Carousel);
                    self.carousel.pointer_down(MOUSE_POINTER, horizontal);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.drag {
                Some(DragTarget::Header) => self.header.pointer_move(MOUSE_POINTER, vertical),
                Some(DragTarget::Carousel) => self.carousel.pointer_move(MOUSE_POINTER, horizontal),
                None => {}
            },
            MouseEventKind::Up(MouseButton::Left) => match self.drag.take() {
                Some(DragTarget::Header) => self.header.pointer_up(MOUSE_POINTER, vertical),
                Some(DragTarget::Carousel) => {
                    if self.carousel.pointer_up(MOUSE_POINTER, horizontal) == ReleaseOutcome::Tap {
                        self.tap_card(column, row);
                    }
                }
                None => {}
            },
            MouseEventKind::Moved => {
                self.hover.card = self.layout.card_at(column, row);
            }
            MouseEventKind::ScrollDown => self.header.scroll_notches(1.0, now_ms),
            MouseEventKind::ScrollUp => self.header.scroll_notches(-1.0, now_ms),
            MouseEventKind::ScrollRight => self.carousel.next(now_ms),
            MouseEventKind::ScrollLeft => self.carousel.previous(now_ms),
            _ => {}
        }
    }

    /// Drop a drag whose release will never reach the gallery, e.g. because
    /// a key press switched pages mid-gesture.
    fn cancel_drag(&mut self) {
        self.drag = None;
        let now = self.now_ms();
        self.header.cancel_gesture(now);
        self.carousel.cancel_gesture(now);
    }

    /// A tap selects the card under it; a tap on the selected card opens it.
    fn tap_card(&mut self, column: u16, row: u16) {
        let Some(card) = self.layout.card_at(column, row) else {
            return;
        };
        if self.carousel.selected() == Some(card) {
            self.open_project(card);
        } else {
            debug!(card, "tap selects card");
            let index = i32::try_from(card).unwrap_or(i32::MAX);
            self.carousel.select(index, self.now_ms());
        }
    }

    fn vertical_sample(&self, row: u16, now_ms: u64) -> GestureSample {
        GestureSample::new(row as f32 * self.cell_height_px, now_ms)
    }

    fn horizontal_sample(&self, column: u16, now_ms: u64) -> GestureSample {
        GestureSample::new(column as f32 * self.cell_width_px, now_ms)
    }

    // ── Project pages ─────────────────────────────────────────────────

    /// Open the project page of a catalog entry. The compact layout loads
    /// the page lazily through the project source.
    pub fn open_project(&mut self, index: usize) {
        self.cancel_drag();
        let Some(project) = self.catalog.by_index(index) else {
            return;
        };
        if !self.viewport.compact {
            self.page = Page::Detail {
                project: Box::new(project.clone()),
                scroll: 0,
            };
            return;
        }

        let slug = project.slug.clone();
        match self.event_tx.clone() {
            Some(tx) => {
                info!(%slug, remote = self.source.is_remote(), "loading project page");
                self.page = Page::Loading { slug: slug.clone() };
                self.animation.start(AnimationId::Loading);
                let source = self.source.clone();
                tokio::spawn(async move {
                    let event = match source.fetch_project(&slug).await {
                        Ok(project) => Event::ProjectLoaded(Box::new(project)),
                        Err(e) => Event::ProjectFailed {
                            slug,
                            message: e.to_string(),
                        },
                    };
                    let _ = tx.send(event);
                });
            }
            None => {
                let loaded = self.catalog.require(&slug).cloned();
                match loaded {
                    Ok(project) => self.on_project_loaded(project),
                    Err(e) => self.on_project_failed(slug, e.to_string()),
                }
            }
        }
    }

    /// Whether a fetch result for `slug` still belongs on screen. Without
    /// an event channel results are delivered synchronously.
    fn is_awaiting(&self, slug: &str) -> bool {
        match &self.page {
            Page::Loading { slug: loading } => loading == slug,
            _ => self.event_tx.is_none(),
        }
    }

    fn on_project_loaded(&mut self, project: Project) {
        // a late answer for a page the user already left is dropped
        if !self.is_awaiting(&project.slug) {
            debug!(slug = %project.slug, "dropping stale project page");
            return;
        }
        self.animation.stop(AnimationId::Loading);
        self.page = Page::Detail {
            project: Box::new(project),
            scroll: 0,
        };
    }

    fn on_project_failed(&mut self, slug: String, message: String) {
        warn!(%slug, %message, "project page unavailable");
        if !self.is_awaiting(&slug) {
            return;
        }
        self.animation.stop(AnimationId::Loading);
        self.show_toast(&format!("Could not load {slug}"), true);
        self.page = Page::NotFound { slug, message };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::surface::SurfacePhase;
    use crossterm::event::KeyEventState;

    const CATALOG: &str = r#"[
        { "slug": "complete", "title": "Complete", "year": "2021", "role": "Director",
          "cover": { "public_id": "complete/cover" } },
        { "slug": "blacklands", "title": "Blacklands", "year": "2022", "role": "Editor",
          "cover": { "public_id": "blacklands/cover" } },
        { "slug": "moma", "title": "MoMA", "year": "2023", "role": "DP",
          "cover": { "public_id": "moma/cover" } },
        { "slug": "kin", "title": "Kin", "year": "2024", "role": "Director",
          "cover": { "public_id": "kin/cover" } }
    ]"#;

    fn app() -> App {
        let catalog = Arc::new(Catalog::from_json(CATALOG).unwrap());
        let source = ProjectSource::local(Arc::clone(&catalog));
        let mut app = App::new(&Config::default(), catalog, source, None).unwrap();
        app.resize(120, 40);
        app.layout = LayoutState {
            header: Rect::new(0, 0, 120, 10),
            body: Rect::new(0, 10, 120, 29),
            cards: vec![
                (0, Rect::new(10, 12, 28, 14)),
                (1, Rect::new(46, 12, 28, 14)),
            ],
        };
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn settle(app: &mut App, mut now: u64) -> u64 {
        for _ in 0..200 {
            now += 16;
            app.handle_event(Event::Tick(now));
            if !app.is_animating() {
                break;
            }
        }
        now
    }

    #[test]
    fn arrow_keys_step_the_carousel() {
        let mut app = app();
        app.handle_event(Event::Tick(0));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        settle(&mut app, 0);
        assert_eq!(app.carousel.index(), 2);
        assert_eq!(app.selected_project().unwrap().slug, "moma");

        app.handle_key(key(KeyCode::End));
        settle(&mut app, 1_000);
        assert_eq!(app.carousel.index(), 3);
        app.handle_key(key(KeyCode::Right));
        settle(&mut app, 2_000);
        assert_eq!(app.carousel.index(), 3);
    }

    #[test]
    fn escape_collapses_then_stays_collapsed() {
        let mut app = app();
        app.handle_key(key(KeyCode::Esc));
        settle(&mut app, 0);
        assert_eq!(app.carousel.index(), -1);
        assert!(app.selected_project().is_none());
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.page, Page::Gallery);
    }

    #[test]
    fn plus_and_minus_step_the_logo() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('+')));
        app.handle_key(key(KeyCode::Char('+')));
        settle(&mut app, 0);
        assert_eq!(app.header.state(), 2);
        assert!((app.header.progress() - 0.66).abs() < 1e-6);
        app.handle_key(key(KeyCode::Char('-')));
        settle(&mut app, 1_000);
        assert_eq!(app.header.state(), 1);
    }

    #[test]
    fn enter_opens_detail_and_escape_returns() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));
        match &app.page {
            Page::Detail { project, scroll } => {
                assert_eq!(project.slug, "complete");
                assert_eq!(*scroll, 0);
            }
            other => panic!("unexpected page {other:?}"),
        }
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Up));
        assert!(matches!(app.page, Page::Detail { scroll: 1, .. }));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.page, Page::Gallery);
    }

    #[test]
    fn help_overlay_swallows_navigation() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.carousel.commits(), 0);
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        app.handle_key(KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        });
        assert!(app.should_quit);
    }

    #[test]
    fn horizontal_drag_swipes_carousel() {
        let mut app = app();
        // 40 columns * 8 px = 320 px leftward: past half of the 200 px threshold
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 80, 20), 1_000);
        assert_eq!(app.carousel.phase(), SurfacePhase::Dragging);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 60, 20), 1_200);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 66, 21), 1_400);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 66, 21), 1_500);
        settle(&mut app, 1_500);
        assert_eq!(app.carousel.index(), 1);
        assert_eq!(app.carousel.commits(), 1);
    }

    #[test]
    fn opening_a_project_mid_drag_drops_the_drag() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 80, 20), 1_000);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 60, 20), 1_200);
        assert_eq!(app.carousel.phase(), SurfacePhase::Dragging);

        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(app.page, Page::Detail { .. }));
        // the release lands on the detail page and never reaches the carousel
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 60, 20), 1_300);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.page, Page::Gallery);

        let now = settle(&mut app, 1_300);
        assert_eq!(app.carousel.phase(), SurfacePhase::Idle);
        assert!(!app.is_animating());
        assert_eq!(app.carousel.index(), 0);

        // 10 columns * 8 px = 80 px, slowly: short of half the threshold
        let start = now + 2_000;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 80, 20), start);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 70, 20), start + 400);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 70, 20), start + 600);
        settle(&mut app, start + 600);
        assert_eq!(app.carousel.index(), 0);
        assert_eq!(app.carousel.phase(), SurfacePhase::Idle);
    }

    #[test]
    fn help_overlay_mid_drag_drops_the_drag() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 8), 0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 3), 400);
        assert_eq!(app.header.phase(), SurfacePhase::Dragging);

        app.handle_key(key(KeyCode::Char('?')));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 50, 3), 500);
        app.handle_key(key(KeyCode::Char('?')));
        settle(&mut app, 500);
        assert_eq!(app.header.phase(), SurfacePhase::Idle);
        assert_eq!(app.header.state(), 1);
        assert_eq!(app.header.commits(), 1);
    }

    #[test]
    fn vertical_drag_morphs_logo() {
        let mut app = app();
        // upward drag of 5 rows * 16 px = 80 px over a 150 px threshold
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 8), 0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 3), 400);
        assert_eq!(app.header.state(), 1);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 50, 3), 500);
        settle(&mut app, 500);
        assert_eq!(app.header.state(), 2);
        assert_eq!(app.carousel.commits(), 0);
    }

    #[test]
    fn wheel_scroll_settles_header() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::ScrollDown, 50, 20), 0);
        app.handle_mouse(mouse(MouseEventKind::ScrollDown, 50, 20), 100);
        assert_eq!(app.header.phase(), SurfacePhase::Dragging);
        settle(&mut app, 100);
        assert_eq!(app.header.phase(), SurfacePhase::Idle);
        assert_eq!(app.header.commits(), 1);
        // 96 px of 150 px, released slowly, is nearest to the 0.66 anchor
        assert_eq!(app.header.state(), 2);
    }

    #[test]
    fn tap_selects_then_opens() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 15), 0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 50, 15), 80);
        settle(&mut app, 80);
        assert_eq!(app.carousel.index(), 1);
        assert_eq!(app.page, Page::Gallery);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 15), 2_000);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 50, 15), 2_050);
        assert!(matches!(&app.page, Page::Detail { project, .. } if project.slug == "blacklands"));
    }

    #[test]
    fn hover_tracks_card_under_pointer() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Moved, 12, 13), 0);
        assert_eq!(app.hover.card, Some(0));
        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 39), 10);
        assert_eq!(app.hover.card, None);
    }

    #[test]
    fn compact_layout_loads_lazily_without_sender() {
        let mut app = app();
        app.resize(60, 40);
        assert!(app.viewport.compact);
        app.open_project(3);
        assert!(matches!(&app.page, Page::Detail { project, .. } if project.slug == "kin"));
    }

    #[test]
    fn failed_fetch_shows_not_found() {
        let mut app = app();
        app.page = Page::Loading {
            slug: "ghost".into(),
        };
        app.handle_event(Event::ProjectFailed {
            slug: "ghost".into(),
            message: "project not found: ghost".into(),
        });
        assert!(matches!(&app.page, Page::NotFound { slug, .. } if slug == "ghost"));
        assert!(app.toast_is_error);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.page, Page::Gallery);
    }

    #[tokio::test]
    async fn compact_layout_fetches_through_the_event_channel() {
        let catalog = Arc::new(Catalog::from_json(CATALOG).unwrap());
        let source = ProjectSource::local(Arc::clone(&catalog));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::default(), catalog, source, Some(tx)).unwrap();
        app.resize(40, 30);

        app.open_project(2);
        assert_eq!(app.page, Page::Loading { slug: "moma".into() });
        assert!(app.is_animating());

        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert!(matches!(&app.page, Page::Detail { project, .. } if project.slug == "moma"));
        assert!(!app.animation.is_active(AnimationId::Loading));
    }

    #[tokio::test]
    async fn stale_fetch_result_is_dropped() {
        let catalog = Arc::new(Catalog::from_json(CATALOG).unwrap());
        let source = ProjectSource::local(Arc::clone(&catalog));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::default(), catalog, source, Some(tx)).unwrap();
        app.resize(40, 30);

        app.open_project(2);
        app.handle_key(key(KeyCode::Esc));
        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert_eq!(app.page, Page::Gallery);
    }
}
