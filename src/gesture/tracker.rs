use tracing::trace;

use super::{Direction, DragState, GestureSample, PointerId, Release};

/// Default jitter tolerance before a drag gets a direction, in px
pub const NOISE_THRESHOLD: f32 = 10.0;

/// Tracks one pointer from press to release along a single axis.
///
/// Only the first pointer is followed; presses from other pointers while a
/// gesture is active are ignored, as are moves and releases that do not
/// belong to the active gesture.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    noise_threshold: f32,
    pointer: Option<PointerId>,
    drag: Option<DragState>,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(NOISE_THRESHOLD)
    }
}

impl GestureTracker {
    pub fn new(noise_threshold: f32) -> Self {
        Self {
            noise_threshold: noise_threshold.max(0.0),
            pointer: None,
            drag: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    #[cfg(test)]
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Begin a gesture. Returns false when another pointer already owns one.
    ///
    /// A second press from the owning pointer means its release was lost;
    /// the stale gesture is dropped and tracking restarts from `sample`.
    pub fn start(&mut self, pointer: PointerId, sample: GestureSample) -> bool {
        if self.drag.is_some() {
            if self.pointer != Some(pointer) {
                trace!(pointer, "ignoring secondary pointer");
                return false;
            }
            trace!(pointer, "restarting gesture after a lost release");
        }
        self.pointer = Some(pointer);
        self.drag = Some(DragState::begin(sample));
        true
    }

    /// Feed a move sample. `None` when there is nothing to update.
    pub fn move_to(&mut self, pointer: PointerId, sample: GestureSample) -> Option<&DragState> {
        if self.pointer != Some(pointer) {
            return None;
        }
        let noise = self.noise_threshold;
        let drag = self.drag.as_mut()?;
        if sample.timestamp_ms < drag.last.timestamp_ms || !sample.position.is_finite() {
            trace!(?sample, "ignoring out-of-order sample");
            return None;
        }
        drag.last = sample;
        drag.distance = drag.origin.position - sample.position;
        // Once decided, the direction follows the sign of the distance but
        // never falls back to None on its way through the noise band.
        let direction = Direction::from_distance(drag.distance, noise);
        if direction != Direction::None {
            drag.direction = direction;
        }
        Some(&*drag)
    }

    /// Finish the gesture with a final sample.
    pub fn end(&mut self, pointer: PointerId, sample: GestureSample) -> Option<Release> {
        if self.pointer != Some(pointer) {
            return None;
        }
        self.move_to(pointer, sample);
        let drag = self.drag.take()?;
        self.pointer = None;

        let elapsed_ms = drag.elapsed_ms();
        let velocity = if elapsed_ms == 0 {
            0.0
        } else {
            drag.distance / elapsed_ms as f32
        };
        Some(Release {
            distance: drag.distance,
            direction: drag.direction,
            velocity,
            elapsed_ms,
        })
    }

    /// Drop the active gesture without producing a release
    pub fn cancel(&mut self) {
        self.pointer = None;
        self.drag = None;
    }
}
