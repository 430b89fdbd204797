//! Quantizing continuous progress into discrete states.

use serde::Deserialize;
use tracing::debug;

use super::Direction;
use crate::error::{FolioError, FolioResult};

/// Banded selector for surfaces with a few fixed levels (e.g. logo sizes).
///
/// Level `i` has the canonical progress `anchors[i]`. Progress in
/// `[anchors[i], anchors[i + 1])` belongs to level `i`; the last level is
/// only reached at its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSelector {
    anchors: Vec<f32>,
    hysteresis: f32,
    fling_threshold: f32,
}

impl BandSelector {
    pub fn new(anchors: Vec<f32>, hysteresis: f32, fling_threshold: f32) -> FolioResult<Self> {
        if anchors.is_empty() {
            return Err(FolioError::Config("band anchors must not be empty".into()));
        }
        if anchors.iter().any(|a| !(0.0..=1.0).contains(a)) {
            return Err(FolioError::Config(format!(
                "band anchors must lie in [0, 1], got {anchors:?}"
            )));
        }
        if anchors.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FolioError::Config(format!(
                "band anchors must be strictly increasing, got {anchors:?}"
            )));
        }
        if !(hysteresis.is_finite() && hysteresis >= 0.0) {
            return Err(FolioError::Config(format!("invalid hysteresis {hysteresis}")));
        }
        Ok(Self {
            anchors,
            hysteresis,
            fling_threshold,
        })
    }

    pub fn levels(&self) -> usize {
        self.anchors.len()
    }

    pub fn last(&self) -> usize {
        self.anchors.len() - 1
    }

    /// Canonical progress of a level
    pub fn anchor(&self, state: usize) -> f32 {
        self.anchors[state.min(self.last())]
    }

    /// Level containing `progress`, without hysteresis
    pub fn band_of(&self, progress: f32) -> usize {
        if progress.is_nan() {
            return 0;
        }
        self.anchors
            .iter()
            .rposition(|anchor| progress >= *anchor)
            .unwrap_or(0)
    }

    /// Level whose anchor is closest to `progress`
    pub fn nearest(&self, progress: f32) -> usize {
        if progress.is_nan() {
            return 0;
        }
        let mut best = 0;
        for (i, anchor) in self.anchors.iter().enumerate() {
            if (anchor - progress).abs() < (self.anchors[best] - progress).abs() {
                best = i;
            }
        }
        best
    }

    /// Live selection while dragging.
    ///
    /// Leaving the current level upwards needs `hysteresis` more progress
    /// than the next anchor; leaving it downwards needs `hysteresis` less than
    /// its own anchor. Without a decided direction the level is kept.
    pub fn select(&self, current: usize, progress: f32, direction: Direction) -> usize {
        let current = current.min(self.last());
        if direction == Direction::None || progress.is_nan() {
            return current;
        }
        let h = self.hysteresis;

        let raised = (current + 1..self.levels())
            .rev()
            .find(|&i| progress >= (self.anchors[i] + h).min(1.0));
        if let Some(next) = raised {
            return next;
        }

        if progress < (self.anchors[current] - h).max(0.0) {
            return (0..current)
                .rev()
                .find(|&i| progress >= (self.anchors[i] - h).max(0.0))
                .unwrap_or(0);
        }
        current
    }

    /// Level committed when the pointer is released.
    ///
    /// A fling commits to the fully advanced or fully reverted level no
    /// matter where progress stopped; otherwise the nearest anchor wins.
    pub fn commit(&self, progress: f32, direction: Direction, velocity: f32) -> usize {
        if velocity.abs() > self.fling_threshold {
            let fling_direction = match direction {
                Direction::None => Direction::from_distance(velocity, 0.0),
                d => d,
            };
            match fling_direction {
                Direction::Forward => {
                    debug!(velocity, "fling forward, committing last level");
                    return self.last();
                }
                Direction::Backward => {
                    debug!(velocity, "fling backward, committing first level");
                    return 0;
                }
                Direction::None => {}
            }
        }
        self.nearest(progress)
    }

    /// Fractional level coordinate of `progress`, e.g. 1.5 halfway between
    /// the anchors of levels 1 and 2. Used by the render projection.
    pub fn position(&self, progress: f32) -> f32 {
        if progress.is_nan() || progress <= self.anchors[0] {
            return 0.0;
        }
        let last = self.last();
        if progress >= self.anchors[last] {
            return last as f32;
        }
        let i = self.band_of(progress);
        let (lo, hi) = (self.anchors[i], self.anchors[i + 1]);
        i as f32 + (progress - lo) / (hi - lo)
    }
}

/// Velocity tier allowing a fling to skip several items
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FlingTier {
    /// Velocity (px/ms) that must be exceeded
    pub min_velocity: f32,
    /// Items skipped by the fling
    pub skip: u32,
}

/// Index navigation for list surfaces such as the carousel.
///
/// Index `-1` is the collapsed state with nothing selected.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStepper {
    pub commit_progress: f32,
    pub fling_threshold: f32,
    fling_tiers: Vec<FlingTier>,
}

impl IndexStepper {
    pub fn new(commit_progress: f32, fling_threshold: f32, mut fling_tiers: Vec<FlingTier>) -> Self {
        fling_tiers.sort_by(|a, b| a.min_velocity.total_cmp(&b.min_velocity));
        Self {
            commit_progress,
            fling_threshold,
            fling_tiers,
        }
    }

    /// Items moved by a release at `velocity`; one unless it is a fling
    pub fn skip_for(&self, velocity: f32) -> u32 {
        let speed = velocity.abs();
        if speed.is_nan() || speed <= self.fling_threshold {
            return 1;
        }
        self.fling_tiers
            .iter()
            .rev()
            .find(|tier| speed > tier.min_velocity)
            .map(|tier| tier.skip.max(1))
            .unwrap_or(1)
    }

    /// Index committed on release, clamped to `[-1, item_count - 1]`.
    ///
    /// Normal releases move at most one item, and only once progress passes
    /// `commit_progress`. Flings skip by tier. Overscroll (negative progress)
    /// never moves.
    pub fn step(
        &self,
        current: i32,
        item_count: usize,
        progress: f32,
        direction: Direction,
        velocity: f32,
    ) -> i32 {
        let max_index = i32::try_from(item_count).unwrap_or(i32::MAX) - 1;
        let current = current.clamp(-1, max_index);
        if direction == Direction::None || progress.is_nan() || progress < 0.0 {
            return current;
        }
        let steps = if velocity.abs() > self.fling_threshold {
            i32::try_from(self.skip_for(velocity)).unwrap_or(i32::MAX)
        } else if progress >= self.commit_progress {
            1
        } else {
            0
        };
        current
            .saturating_add(direction.step().saturating_mul(steps))
            .clamp(-1, max_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo() -> BandSelector {
        BandSelector::new(vec![0.0, 0.33, 0.66, 1.0], 0.02, 2.5).unwrap()
    }

    fn stepper() -> IndexStepper {
        IndexStepper::new(
            0.5,
            2.5,
            vec![
                FlingTier {
                    min_velocity: 4.0,
                    skip: 3,
                },
                FlingTier {
                    min_velocity: 2.5,
                    skip: 2,
                },
            ],
        )
    }

    #[test]
    fn rejects_bad_anchors() {
        assert!(BandSelector::new(vec![], 0.0, 1.0).is_err());
        assert!(BandSelector::new(vec![0.0, 0.5, 0.5], 0.0, 1.0).is_err());
        assert!(BandSelector::new(vec![0.0, 1.5], 0.0, 1.0).is_err());
        assert!(BandSelector::new(vec![0.0, 1.0], -0.1, 1.0).is_err());
    }

    #[test]
    fn half_progress_lands_in_second_band() {
        let sel = logo();
        let progress = crate::gesture::progress::map_distance_to_progress(75.0, 150.0);
        assert_eq!(sel.band_of(progress), 1);
        assert_eq!(sel.select(0, progress, Direction::Forward), 1);
    }

    #[test]
    fn hysteresis_delays_boundary_crossing() {
        let sel = logo();
        // just past the 0.33 boundary but inside the hysteresis band
        assert_eq!(sel.select(0, 0.34, Direction::Forward), 0);
        assert_eq!(sel.select(0, 0.36, Direction::Forward), 1);
        // coming back down, level 1 holds until below 0.31
        assert_eq!(sel.select(1, 0.32, Direction::Backward), 1);
        assert_eq!(sel.select(1, 0.30, Direction::Backward), 0);
    }

    #[test]
    fn no_oscillation_at_exact_boundary() {
        let sel = logo();
        let mut state = 1;
        for i in 0..20 {
            let direction = if i % 2 == 0 {
                Direction::Forward
            } else {
                Direction::Backward
            };
            state = sel.select(state, 0.33, direction);
            assert_eq!(state, 1);
        }
    }

    #[test]
    fn full_progress_reaches_last_level() {
        let sel = logo();
        assert_eq!(sel.select(0, 1.0, Direction::Forward), 3);
        assert_eq!(sel.select(3, 0.0, Direction::Backward), 0);
    }

    #[test]
    fn no_direction_keeps_state() {
        let sel = logo();
        assert_eq!(sel.select(2, 0.0, Direction::None), 2);
        assert_eq!(sel.select(9, 0.5, Direction::None), 3);
    }

    #[test]
    fn commit_picks_nearest_anchor_without_fling() {
        let sel = logo();
        assert_eq!(sel.commit(0.40, Direction::Forward, 0.3), 1);
        assert_eq!(sel.commit(0.55, Direction::Forward, 0.3), 2);
        assert_eq!(sel.commit(0.10, Direction::Backward, -0.3), 0);
    }

    #[test]
    fn fling_commits_to_extremes() {
        let sel = logo();
        assert_eq!(sel.commit(0.10, Direction::Forward, 3.0), 3);
        assert_eq!(sel.commit(0.90, Direction::Backward, -3.0), 0);
        assert_eq!(sel.commit(0.40, Direction::None, -3.0), 0);
    }

    #[test]
    fn position_interpolates_between_anchors() {
        let sel = logo();
        assert_eq!(sel.position(0.0), 0.0);
        assert!((sel.position(0.495) - 1.5).abs() < 1e-4);
        assert_eq!(sel.position(1.0), 3.0);
        assert_eq!(sel.position(-0.2), 0.0);
    }

    #[test]
    fn normal_release_moves_at_most_one_item() {
        let st = stepper();
        assert_eq!(st.step(2, 8, 0.4, Direction::Forward, 1.0), 2);
        assert_eq!(st.step(2, 8, 0.6, Direction::Forward, 1.0), 3);
        assert_eq!(st.step(2, 8, 1.0, Direction::Backward, -2.4), 1);
    }

    #[test]
    fn fling_skips_by_velocity_tier() {
        let st = stepper();
        assert_eq!(st.skip_for(3.0), 2);
        assert_eq!(st.skip_for(-4.5), 3);
        assert_eq!(st.skip_for(2.5), 1);
        assert_eq!(st.step(2, 8, 0.2, Direction::Forward, 3.0), 4);
        assert_eq!(st.step(2, 8, 0.2, Direction::Forward, 6.0), 5);
        assert_eq!(st.step(6, 8, 0.2, Direction::Forward, 6.0), 7);
    }

    #[test]
    fn index_is_clamped_to_collapsed_and_last() {
        let st = stepper();
        assert_eq!(st.step(0, 8, 0.9, Direction::Backward, -1.0), -1);
        assert_eq!(st.step(-1, 8, 0.9, Direction::Backward, -5.0), -1);
        assert_eq!(st.step(7, 8, 0.9, Direction::Forward, 1.0), 7);
        assert_eq!(st.step(3, 0, 0.9, Direction::Forward, 1.0), -1);
    }

    #[test]
    fn huge_counts_and_skips_saturate() {
        let st = stepper();
        assert_eq!(st.step(5, usize::MAX, 0.9, Direction::Forward, 1.0), 6);

        let wild = IndexStepper::new(
            0.5,
            2.5,
            vec![FlingTier {
                min_velocity: 2.5,
                skip: u32::MAX,
            }],
        );
        assert_eq!(
            wild.step(10, usize::MAX, 0.2, Direction::Forward, 9.0),
            i32::MAX - 1
        );
        assert_eq!(wild.step(10, usize::MAX, 0.2, Direction::Backward, -9.0), -1);
        assert_eq!(wild.step(1, 3, 0.2, Direction::Forward, 9.0), 2);
    }

    #[test]
    fn overscroll_never_steps() {
        let st = stepper();
        assert_eq!(st.step(7, 8, -0.3, Direction::Forward, 9.0), 7);
    }
}
