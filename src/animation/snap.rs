//! Time-boxed snap animation from a start progress to a target progress.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::clock::{FrameCallbackRegistration, FrameScheduler};
use super::easing::Easing;

/// One eased interpolation between two progress values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRun {
    pub start_progress: f32,
    pub target_progress: f32,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl AnimationRun {
    pub fn new(
        start_progress: f32,
        target_progress: f32,
        start_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Self {
        Self {
            start_progress,
            target_progress,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Linear time fraction `t = min(1, elapsed / duration)`.
    pub fn fraction(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 || self.start_progress == self.target_progress {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f32;
        (elapsed / self.duration_ms as f32).min(1.0)
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.fraction(now_ms) >= 1.0
    }

    /// Progress at `now_ms`. Exactly the target once finished.
    pub fn sample(&self, now_ms: u64) -> f32 {
        let t = self.fraction(now_ms);
        if t >= 1.0 {
            return self.target_progress;
        }
        let eased = self.easing.apply(t);
        self.start_progress + (self.target_progress - self.start_progress) * eased
    }
}

type FrameFn = Box<dyn FnMut(f32)>;
type CompleteFn = Box<dyn FnOnce(f32)>;

struct ActiveRun {
    run: AnimationRun,
    on_frame: FrameFn,
    on_complete: Option<CompleteFn>,
    registration: Option<FrameCallbackRegistration>,
}

#[derive(Default)]
struct Shared {
    active: Option<ActiveRun>,
    // Bumped on every start/cancel so a frame that is mid-flight can tell
    // it has been superseded.
    generation: u64,
}

/// Drives at most one [`AnimationRun`] at a time on a frame scheduler.
pub struct SnapAnimator {
    scheduler: Rc<dyn FrameScheduler>,
    shared: Rc<RefCell<Shared>>,
}

impl std::fmt::Debug for SnapAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("SnapAnimator")
            .field("run", &shared.active.as_ref().map(|a| a.run))
            .field("generation", &shared.generation)
            .finish()
    }
}

impl SnapAnimator {
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            shared: Rc::new(RefCell::new(Shared::default())),
        }
    }

    /// Start `run`, replacing any run in flight.
    ///
    /// `on_frame` receives the interpolated progress on every frame before
    /// the end. `on_complete` is called exactly once with the exact target.
    /// Neither fires for a run that gets cancelled or replaced.
    pub fn start(
        &mut self,
        run: AnimationRun,
        on_frame: impl FnMut(f32) + 'static,
        on_complete: impl FnOnce(f32) + 'static,
    ) {
        self.cancel();
        trace!(
            start = run.start_progress,
            target = run.target_progress,
            duration_ms = run.duration_ms,
            "snap animation started"
        );
        self.shared.borrow_mut().active = Some(ActiveRun {
            run,
            on_frame: Box::new(on_frame),
            on_complete: Some(Box::new(on_complete)),
            registration: None,
        });
        schedule_next(&self.shared, &self.scheduler);
    }

    /// Cancel the run in flight. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let previous = {
            let mut shared = self.shared.borrow_mut();
            shared.generation += 1;
            shared.active.take()
        };
        // Dropping the run drops its registration, which removes the
        // pending frame callback from the scheduler.
        let was_running = previous.is_some();
        drop(previous);
        if was_running {
            trace!("snap animation cancelled");
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.shared.borrow().active.is_some()
    }
}

impl Drop for SnapAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn schedule_next(shared: &Rc<RefCell<Shared>>, scheduler: &Rc<dyn FrameScheduler>) {
    let weak = Rc::downgrade(shared);
    let frame_scheduler = Rc::clone(scheduler);
    let registration = scheduler.schedule(Box::new(move |frame_ms| {
        if let Some(shared) = weak.upgrade() {
            step(&shared, &frame_scheduler, frame_ms);
        }
    }));
    if let Some(active) = shared.borrow_mut().active.as_mut() {
        active.registration = Some(registration);
    }
}

fn step(shared: &Rc<RefCell<Shared>>, scheduler: &Rc<dyn FrameScheduler>, frame_ms: u64) {
    let (generation, mut active) = {
        let mut guard = shared.borrow_mut();
        let generation = guard.generation;
        match guard.active.take() {
            Some(active) => (generation, active),
            None => return,
        }
    };
    // This callback has fired; its registration has nothing left to cancel.
    active.registration = None;

    if active.run.is_finished(frame_ms) {
        let target = active.run.target_progress;
        trace!(target, "snap animation finished");
        if let Some(on_complete) = active.on_complete.take() {
            on_complete(target);
        }
        return;
    }

    let value = active.run.sample(frame_ms);
    (active.on_frame)(value);

    {
        let mut guard = shared.borrow_mut();
        if guard.generation != generation || guard.active.is_some() {
            // Cancelled or replaced from inside `on_frame`.
            return;
        }
        guard.active = Some(active);
    }
    schedule_next(shared, scheduler);
}
