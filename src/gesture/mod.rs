//! Gesture-driven animation state machine.
//!
//! One parameterized implementation shared by every gesture surface:
//! a tracker turns pointer samples into drag distance and velocity, the
//! progress mapper normalizes distance, the selectors quantize progress into
//! discrete states, and the surfaces run snap animations on release.

pub mod carousel;
pub mod progress;
pub mod selector;
pub mod surface;
pub mod tracker;

pub use carousel::CarouselSurface;
pub use surface::BandSurface;

/// Identifies the pointer (mouse button, touch id) that owns a gesture
pub type PointerId = u32;

/// Sign convention: `Forward` is the deliberate gesture (an upward swipe on
/// the header, a leftward swipe on the carousel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    None,
}

impl Direction {
    /// Direction of a signed distance, `None` while within the noise threshold
    pub fn from_distance(distance: f32, noise_threshold: f32) -> Self {
        if !distance.is_finite() || distance.abs() <= noise_threshold {
            Direction::None
        } else if distance > 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
            Direction::None => 0.0,
        }
    }

    pub fn step(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
            Direction::None => 0,
        }
    }
}

/// One pointer reading along the surface axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    /// Position along the surface axis in px
    pub position: f32,
    /// Milliseconds on the application clock
    pub timestamp_ms: u64,
}

impl GestureSample {
    pub fn new(position: f32, timestamp_ms: u64) -> Self {
        Self {
            position,
            timestamp_ms,
        }
    }
}

/// Live state of an active drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub origin: GestureSample,
    pub last: GestureSample,
    /// `origin.position - last.position`; positive is a forward gesture
    pub distance: f32,
    pub direction: Direction,
}

impl DragState {
    pub fn begin(origin: GestureSample) -> Self {
        Self {
            origin,
            last: origin,
            distance: 0.0,
            direction: Direction::None,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.last.timestamp_ms.saturating_sub(self.origin.timestamp_ms)
    }
}

/// Summary handed out when a gesture ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub distance: f32,
    pub direction: Direction,
    /// Average velocity over the whole gesture in px/ms, signed like `distance`
    pub velocity: f32,
    pub elapsed_ms: u64,
}
