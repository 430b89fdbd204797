//! Banded gesture surface: the scroll- and drag-driven logo morph.
//!
//! `Idle -> Dragging -> (release) -> Animating -> Idle`. The discrete level
//! follows the drag live and is committed on release; the snap animation
//! then carries progress to the committed level's anchor.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use tracing::debug;

use super::progress::map_distance_to_progress;
use super::selector::BandSelector;
use super::tracker::GestureTracker;
use super::{Direction, GestureSample, PointerId, Release};
use crate::animation::clock::FrameScheduler;
use crate::animation::easing::Easing;
use crate::animation::snap::{AnimationRun, SnapAnimator};
use crate::error::FolioResult;

/// Pointer id reserved for synthetic wheel gestures
pub const WHEEL_POINTER: PointerId = PointerId::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfacePhase {
    #[default]
    Idle,
    Dragging,
    Animating,
}

/// Tuning for a banded surface
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BandSurfaceConfig {
    /// Drag distance (px) that covers the full progress range
    pub drag_threshold: f32,
    /// Canonical progress of each level, strictly increasing in [0, 1]
    pub anchors: Vec<f32>,
    pub hysteresis: f32,
    pub noise_threshold: f32,
    /// Release velocity (px/ms) above which a gesture counts as a fling
    pub fling_threshold: f32,
    pub duration_ms: u64,
    pub easing: Easing,
    /// Quiet time after the last wheel event before the wheel gesture ends
    pub scroll_settle_ms: u64,
    /// Distance (px) covered by one wheel notch
    pub scroll_step_px: f32,
}

impl Default for BandSurfaceConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 150.0,
            anchors: vec![0.0, 0.33, 0.66, 1.0],
            hysteresis: 0.02,
            noise_threshold: super::tracker::NOISE_THRESHOLD,
            fling_threshold: 2.5,
            duration_ms: 400,
            easing: Easing::CubicOut,
            scroll_settle_ms: 150,
            scroll_step_px: 48.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BandModel {
    progress: f32,
    state: usize,
    phase: SurfacePhase,
}

#[derive(Debug, Clone, Copy)]
struct WheelGesture {
    position: f32,
    last_ms: u64,
}

#[derive(Debug)]
pub struct BandSurface {
    config: BandSurfaceConfig,
    selector: BandSelector,
    tracker: GestureTracker,
    animator: SnapAnimator,
    model: Rc<RefCell<BandModel>>,
    drag_base: f32,
    wheel: Option<WheelGesture>,
    commits: u64,
}

impl BandSurface {
    pub fn new(config: BandSurfaceConfig, scheduler: Rc<dyn FrameScheduler>) -> FolioResult<Self> {
        let selector = BandSelector::new(
            config.anchors.clone(),
            config.hysteresis,
            config.fling_threshold,
        )?;
        let model = BandModel {
            progress: selector.anchor(0),
            ..BandModel::default()
        };
        Ok(Self {
            tracker: GestureTracker::new(config.noise_threshold),
            animator: SnapAnimator::new(scheduler),
            selector,
            config,
            model: Rc::new(RefCell::new(model)),
            drag_base: 0.0,
            wheel: None,
            commits: 0,
        })
    }

    pub fn progress(&self) -> f32 {
        self.model.borrow().progress
    }

    pub fn state(&self) -> usize {
        self.model.borrow().state
    }

    pub fn phase(&self) -> SurfacePhase {
        self.model.borrow().phase
    }

    /// Number of discrete-state commits so far (one per finished gesture or
    /// explicit selection)
    #[cfg(test)]
    pub fn commits(&self) -> u64 {
        self.commits
    }

    #[cfg(test)]
    pub fn levels(&self) -> usize {
        self.selector.levels()
    }

    /// Fractional level coordinate for the render projection
    pub fn position(&self) -> f32 {
        self.selector.position(self.progress())
    }

    pub fn is_busy(&self) -> bool {
        self.phase() != SurfacePhase::Idle || self.wheel.is_some() || self.animator.is_running()
    }

    // ── Pointer gestures ──────────────────────────────────────────────

    pub fn pointer_down(&mut self, pointer: PointerId, sample: GestureSample) {
        if pointer != WHEEL_POINTER && self.wheel.is_some() {
            self.finish_wheel();
        }
        if !self.tracker.start(pointer, sample) {
            return;
        }
        if self.animator.cancel() {
            debug!("header animation interrupted by a new gesture");
        }
        let mut model = self.model.borrow_mut();
        model.phase = SurfacePhase::Dragging;
        self.drag_base = model.progress;
    }

    pub fn pointer_move(&mut self, pointer: PointerId, sample: GestureSample) {
        let Some(drag) = self.tracker.move_to(pointer, sample).copied() else {
            return;
        };
        let progress = self.drag_progress(drag.distance);
        let mut model = self.model.borrow_mut();
        model.progress = progress;
        model.state = self.selector.select(model.state, progress, drag.direction);
    }

    pub fn pointer_up(&mut self, pointer: PointerId, sample: GestureSample) {
        let Some(release) = self.tracker.end(pointer, sample) else {
            return;
        };
        self.release(release, sample.timestamp_ms);
    }

    // ── Wheel gestures ────────────────────────────────────────────────

    /// Feed a wheel delta in px; positive scrolls forward.
    pub fn scroll(&mut self, delta_px: f32, now_ms: u64) {
        if self.wheel.is_none() {
            if self.tracker.is_active() {
                // a pointer drag owns the surface
                return;
            }
            self.pointer_down(WHEEL_POINTER, GestureSample::new(0.0, now_ms));
            self.wheel = Some(WheelGesture {
                position: 0.0,
                last_ms: now_ms,
            });
        }
        let Some(wheel) = self.wheel.as_mut() else {
            return;
        };
        wheel.position -= delta_px;
        wheel.last_ms = wheel.last_ms.max(now_ms);
        let sample = GestureSample::new(wheel.position, wheel.last_ms);
        self.pointer_move(WHEEL_POINTER, sample);
    }

    /// Scroll by whole wheel notches
    pub fn scroll_notches(&mut self, notches: f32, now_ms: u64) {
        self.scroll(notches * self.config.scroll_step_px, now_ms);
    }

    /// End the wheel gesture once the wheel has been quiet long enough.
    pub fn settle(&mut self, now_ms: u64) {
        let Some(wheel) = self.wheel else {
            return;
        };
        if now_ms.saturating_sub(wheel.last_ms) >= self.config.scroll_settle_ms {
            self.finish_wheel();
        }
    }

    fn finish_wheel(&mut self) {
        if let Some(wheel) = self.wheel.take() {
            let sample = GestureSample::new(wheel.position, wheel.last_ms);
            self.pointer_up(WHEEL_POINTER, sample);
        }
    }

    // ── Explicit selection ────────────────────────────────────────────

    /// Animate to `state` (clamped to the valid levels), e.g. from a key press.
    pub fn select(&mut self, state: usize, now_ms: u64) {
        self.tracker.cancel();
        self.wheel = None;
        let target = state.min(self.selector.last());
        self.commit(target, now_ms);
    }

    /// Abandon a drag in flight and settle on the level it currently shows
    pub fn cancel_gesture(&mut self, now_ms: u64) {
        if self.tracker.is_active() {
            debug!("header gesture cancelled");
            self.select(self.state(), now_ms);
        }
    }

    /// Move by `delta` levels from the current one
    pub fn step(&mut self, delta: i32, now_ms: u64) {
        let last = self.selector.last() as i32;
        let target = (self.state() as i32 + delta).clamp(0, last);
        self.select(target as usize, now_ms);
    }

    // ── Internals ─────────────────────────────────────────────────────

    fn drag_progress(&self, distance: f32) -> f32 {
        let delta = map_distance_to_progress(distance, self.config.drag_threshold);
        (self.drag_base + distance.signum() * delta).clamp(0.0, 1.0)
    }

    fn release(&mut self, release: Release, now_ms: u64) {
        let progress = self.drag_progress(release.distance);
        self.model.borrow_mut().progress = progress;
        let direction = if release.direction == Direction::None {
            Direction::from_distance(release.velocity, 0.0)
        } else {
            release.direction
        };
        let target = self.selector.commit(progress, direction, release.velocity);
        self.commit(target, now_ms);
    }

    fn commit(&mut self, target: usize, now_ms: u64) {
        self.commits += 1;
        let start = {
            let mut model = self.model.borrow_mut();
            model.state = target;
            model.phase = SurfacePhase::Animating;
            model.progress
        };
        let target_progress = self.selector.anchor(target);
        debug!(
            target,
            start,
            target_progress,
            commit = self.commits,
            "header level committed"
        );

        let run = AnimationRun::new(
            start,
            target_progress,
            now_ms,
            self.config.duration_ms,
            self.config.easing,
        );
        let frame_model = Rc::clone(&self.model);
        let done_model = Rc::clone(&self.model);
        self.animator.start(
            run,
            move |progress| frame_model.borrow_mut().progress = progress,
            move |progress| {
                let mut model = done_model.borrow_mut();
                model.progress = progress;
                model.state = target;
                model.phase = SurfacePhase::Idle;
            },
        );
    }
}
