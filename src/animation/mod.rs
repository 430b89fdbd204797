pub mod clock;
pub mod easing;
pub mod snap;
pub mod spinner;

use std::collections::HashSet;

/// Identifies UI-level animations that keep the render loop busy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationId {
    /// Spinner while a project is lazy-loaded
    Loading,
    /// Swipe hint under an idle carousel
    SwipeHint,
}

/// Tracks frame timing and the decorative animations of the application.
/// Gesture-driven animations live on their surfaces, not here.
#[derive(Debug, Default)]
pub struct AnimationState {
    /// Number of frames rendered so far
    pub frame_count: u64,
    /// Clock time of the latest frame (ms since startup)
    pub now_ms: u64,
    /// Currently active decorative animations
    pub active: HashSet<AnimationId>,
}

impl AnimationState {
    /// Advance to the frame at `now_ms`
    pub fn tick(&mut self, now_ms: u64) {
        self.frame_count = self.frame_count.wrapping_add(1);
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn has_active_animation(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn start(&mut self, id: AnimationId) {
        self.active.insert(id);
    }

    pub fn stop(&mut self, id: AnimationId) {
        self.active.remove(&id);
    }

    pub fn is_active(&self, id: AnimationId) -> bool {
        self.active.contains(&id)
    }
}

/// Linear interpolation with the fraction clamped to [0, 1]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_clamps_fraction() {
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, -1.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 2.0), 20.0);
    }

    #[test]
    fn tick_keeps_time_monotonic() {
        let mut state = AnimationState::default();
        state.tick(100);
        state.tick(50);
        assert_eq!(state.now_ms, 100);
        assert_eq!(state.frame_count, 2);
    }

    #[test]
    fn start_and_stop_track_activity() {
        let mut state = AnimationState::default();
        state.start(AnimationId::Loading);
        assert!(state.has_active_animation());
        state.stop(AnimationId::Loading);
        assert!(!state.is_active(AnimationId::Loading));
    }
}
