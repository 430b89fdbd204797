//! Swipeable list surface.
//!
//! The committed index changes only on release (or explicit selection).
//! Between commits the view is displaced from the index by `offset` items:
//! the drag writes it live, and the snap animation carries it back to 0 once
//! a new index has been committed. Dragging past either end of the list
//! switches to the rubber-band mapping.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use tracing::debug;

use super::progress::{map_distance_to_progress, RubberBand};
use super::selector::{FlingTier, IndexStepper};
use super::surface::SurfacePhase;
use super::tracker::GestureTracker;
use super::{Direction, GestureSample, PointerId};
use crate::animation::clock::FrameScheduler;
use crate::animation::easing::Easing;
use crate::animation::snap::{AnimationRun, SnapAnimator};

/// Index of the collapsed state with no card selected
pub const COLLAPSED: i32 = -1;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Drag distance (px) that moves the view by one item
    pub drag_threshold: f32,
    pub noise_threshold: f32,
    /// Progress past which a slow release moves to the next item
    pub commit_progress: f32,
    pub fling_threshold: f32,
    pub fling_tiers: Vec<FlingTier>,
    pub rubber_band: RubberBand,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 200.0,
            noise_threshold: super::tracker::NOISE_THRESHOLD,
            commit_progress: 0.5,
            fling_threshold: 2.5,
            fling_tiers: vec![
                FlingTier {
                    min_velocity: 2.5,
                    skip: 2,
                },
                FlingTier {
                    min_velocity: 4.0,
                    skip: 3,
                },
            ],
            rubber_band: RubberBand::default(),
            duration_ms: 300,
            easing: Easing::CubicOut,
        }
    }
}

/// What a release turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The pointer never left the noise band
    Tap,
    /// The gesture committed this index
    Committed(i32),
    /// The release did not belong to an active gesture
    Ignored,
}

#[derive(Debug, Clone, Copy, Default)]
struct CarouselModel {
    index: i32,
    offset: f32,
    progress: f32,
    phase: SurfacePhase,
}

#[derive(Debug)]
pub struct CarouselSurface {
    config: CarouselConfig,
    stepper: IndexStepper,
    tracker: GestureTracker,
    animator: SnapAnimator,
    model: Rc<RefCell<CarouselModel>>,
    item_count: usize,
    drag_base: f32,
    commits: u64,
}

impl CarouselSurface {
    pub fn new(config: CarouselConfig, item_count: usize, scheduler: Rc<dyn FrameScheduler>) -> Self {
        let stepper = IndexStepper::new(
            config.commit_progress,
            config.fling_threshold,
            config.fling_tiers.clone(),
        );
        let model = CarouselModel {
            index: if item_count > 0 { 0 } else { COLLAPSED },
            ..CarouselModel::default()
        };
        Self {
            tracker: GestureTracker::new(config.noise_threshold),
            animator: SnapAnimator::new(scheduler),
            stepper,
            config,
            model: Rc::new(RefCell::new(model)),
            item_count,
            drag_base: 0.0,
            commits: 0,
        }
    }

    /// Committed index, `-1` when collapsed
    pub fn index(&self) -> i32 {
        self.model.borrow().index
    }

    pub fn selected(&self) -> Option<usize> {
        usize::try_from(self.index()).ok()
    }

    /// Progress of the live drag: in [0, 1], or negative while overscrolling
    pub fn progress(&self) -> f32 {
        self.model.borrow().progress
    }

    /// Displacement of the view from the committed index, in items
    #[cfg(test)]
    pub fn offset(&self) -> f32 {
        self.model.borrow().offset
    }

    /// Continuous view position in item units
    pub fn position(&self) -> f32 {
        let model = self.model.borrow();
        model.index as f32 + model.offset
    }

    pub fn phase(&self) -> SurfacePhase {
        self.model.borrow().phase
    }

    #[cfg(test)]
    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn is_busy(&self) -> bool {
        self.phase() != SurfacePhase::Idle || self.animator.is_running()
    }

    // ── Pointer gestures ──────────────────────────────────────────────

    pub fn pointer_down(&mut self, pointer: PointerId, sample: GestureSample) {
        if !self.tracker.start(pointer, sample) {
            return;
        }
        if self.animator.cancel() {
            debug!("carousel animation interrupted by a new gesture");
        }
        let mut model = self.model.borrow_mut();
        model.phase = SurfacePhase::Dragging;
        model.progress = 0.0;
        self.drag_base = model.offset;
    }

    pub fn pointer_move(&mut self, pointer: PointerId, sample: GestureSample) {
        let Some(drag) = self.tracker.move_to(pointer, sample).copied() else {
            return;
        };
        let (offset, progress) = self.drag_offset(drag.distance);
        let mut model = self.model.borrow_mut();
        model.offset = offset;
        model.progress = progress;
    }

    pub fn pointer_up(&mut self, pointer: PointerId, sample: GestureSample) -> ReleaseOutcome {
        let Some(release) = self.tracker.end(pointer, sample) else {
            return ReleaseOutcome::Ignored;
        };
        let (offset, progress) = self.drag_offset(release.distance);
        let index = {
            let mut model = self.model.borrow_mut();
            model.offset = offset;
            model.progress = progress;
            model.index
        };

        if release.direction == Direction::None {
            self.commit(index, sample.timestamp_ms);
            return ReleaseOutcome::Tap;
        }

        // Progress toward the release direction; an interrupted animation can
        // leave the view displaced against it, which counts as no progress.
        let step_progress = if progress < 0.0 {
            progress
        } else {
            (offset * release.direction.sign()).clamp(0.0, 1.0)
        };
        let target = self.stepper.step(
            index,
            self.item_count,
            step_progress,
            release.direction,
            release.velocity,
        );
        debug!(
            from = index,
            to = target,
            velocity = release.velocity,
            progress = step_progress,
            "carousel release"
        );
        self.commit(target, sample.timestamp_ms);
        ReleaseOutcome::Committed(target)
    }

    // ── Explicit selection ────────────────────────────────────────────

    /// Animate to `index` (clamped to `[-1, item_count - 1]`), e.g. from a
    /// key press or a tap on a card.
    pub fn select(&mut self, index: i32, now_ms: u64) {
        self.tracker.cancel();
        let max_index = i32::try_from(self.item_count).unwrap_or(i32::MAX) - 1;
        self.commit(index.clamp(COLLAPSED, max_index), now_ms);
    }

    /// Abandon a drag in flight and settle back on the committed index
    pub fn cancel_gesture(&mut self, now_ms: u64) {
        if self.tracker.is_active() {
            debug!("carousel gesture cancelled");
            self.select(self.index(), now_ms);
        }
    }

    pub fn next(&mut self, now_ms: u64) {
        self.select(self.index() + 1, now_ms);
    }

    pub fn previous(&mut self, now_ms: u64) {
        self.select(self.index() - 1, now_ms);
    }

    pub fn collapse(&mut self, now_ms: u64) {
        self.select(COLLAPSED, now_ms);
    }

    // ── Internals ─────────────────────────────────────────────────────

    /// View offset and drag progress for a signed drag distance
    fn drag_offset(&self, distance: f32) -> (f32, f32) {
        let threshold = self.config.drag_threshold;
        let progress = map_distance_to_progress(distance, threshold);
        let raw = self.drag_base + distance.signum() * progress;

        let index = self.model.borrow().index;
        let last = i32::try_from(self.item_count).unwrap_or(i32::MAX) - 1;
        let forward_limit = last.saturating_sub(index).max(0) as f32;
        let backward_limit = (COLLAPSED - index).min(0) as f32;

        let band = self.config.rubber_band;
        if raw > forward_limit {
            let excess_px = self.drag_base_px() + distance - forward_limit * threshold;
            let give = band.progress(excess_px.max(0.0));
            (forward_limit - give, give)
        } else if raw < backward_limit {
            let excess_px = backward_limit * threshold - (self.drag_base_px() + distance);
            let give = band.progress(excess_px.max(0.0));
            (backward_limit + give, give)
        } else {
            (raw, progress)
        }
    }

    fn drag_base_px(&self) -> f32 {
        self.drag_base * self.config.drag_threshold
    }

    fn commit(&mut self, target: i32, now_ms: u64) {
        self.commits += 1;
        let start = {
            let mut model = self.model.borrow_mut();
            let position = model.index as f32 + model.offset;
            model.index = target;
            model.offset = position - target as f32;
            model.progress = 0.0;
            model.phase = SurfacePhase::Animating;
            model.offset
        };
        debug!(target, start, commit = self.commits, "carousel index committed");
        let run = AnimationRun::new(
            start,
            0.0,
            now_ms,
            self.config.duration_ms,
            self.config.easing,
        );
        let frame_model = Rc::clone(&self.model);
        let done_model = Rc::clone(&self.model);
        self.animator.start(
            run,
            move |offset| frame_model.borrow_mut().offset = offset,
            move |offset| {
                let mut model = done_model.borrow_mut();
                model.offset = offset;
                model.phase = SurfacePhase::Idle;
            },
        );
    }
}
