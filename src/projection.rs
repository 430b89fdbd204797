//! Projection of discrete state plus continuous progress into visual params.
//!
//! A table has one row per discrete state. Rendering asks for a fractional
//! position (e.g. 1.4 while dragging from state 1 towards state 2) and gets
//! the row-wise linear interpolation.

use serde::Deserialize;

use crate::animation::lerp;
use crate::error::{FolioError, FolioResult};

/// Concrete visual values for one state. Units are up to the renderer
/// (terminal rows for heights and offsets).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct VisualParams {
    pub height: f32,
    pub offset: f32,
    pub opacity: f32,
    pub gap: f32,
}

impl VisualParams {
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            height: lerp(self.height, other.height, t),
            offset: lerp(self.offset, other.offset, t),
            opacity: lerp(self.opacity, other.opacity, t),
            gap: lerp(self.gap, other.gap, t),
        }
    }

    /// Height rounded to whole rows, never negative
    pub fn rows(&self) -> u16 {
        self.height.round().clamp(0.0, u16::MAX as f32) as u16
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionTable {
    rows: Vec<VisualParams>,
}

impl ProjectionTable {
    pub fn new(rows: Vec<VisualParams>) -> FolioResult<Self> {
        if rows.is_empty() {
            return Err(FolioError::Config("projection table has no rows".into()));
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row of a discrete state, clamped to the last row
    pub fn row(&self, state: usize) -> VisualParams {
        self.rows[state.min(self.rows.len() - 1)]
    }

    /// Interpolated params for a fractional state position
    pub fn sample(&self, position: f32) -> VisualParams {
        let last = (self.rows.len() - 1) as f32;
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, last)
        };
        let lower = position.floor() as usize;
        let t = position - lower as f32;
        if t == 0.0 {
            return self.row(lower);
        }
        self.row(lower).lerp(&self.row(lower + 1), t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo() -> ProjectionTable {
        ProjectionTable::new(vec![
            VisualParams {
                height: 9.0,
                offset: 0.0,
                opacity: 1.0,
                gap: 2.0,
            },
            VisualParams {
                height: 6.0,
                offset: 1.0,
                opacity: 1.0,
                gap: 1.0,
            },
            VisualParams {
                height: 3.0,
                offset: 2.0,
                opacity: 0.6,
                gap: 1.0,
            },
            VisualParams {
                height: 1.0,
                offset: 2.0,
                opacity: 0.0,
                gap: 0.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(ProjectionTable::new(Vec::new()).is_err());
    }

    #[test]
    fn integral_positions_are_plain_lookups() {
        let table = logo();
        for state in 0..table.len() {
            assert_eq!(table.sample(state as f32), table.row(state));
        }
        assert_eq!(table.row(99), table.row(3));
    }

    #[test]
    fn fractional_positions_interpolate() {
        let table = logo();
        let mid = table.sample(1.5);
        assert_eq!(mid.height, 4.5);
        assert_eq!(mid.offset, 1.5);
        assert!((mid.opacity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_and_nan_are_clamped() {
        let table = logo();
        assert_eq!(table.sample(-2.0), table.row(0));
        assert_eq!(table.sample(7.5), table.row(3));
        assert_eq!(table.sample(f32::NAN), table.row(0));
    }

    #[test]
    fn sampling_is_idempotent() {
        let table = logo();
        for i in 0..=30 {
            let position = i as f32 / 10.0;
            assert_eq!(table.sample(position), table.sample(position));
        }
    }

    #[test]
    fn rows_rounds_height() {
        let table = logo();
        assert_eq!(table.sample(0.5).rows(), 8);
        assert_eq!(VisualParams::default().rows(), 0);
    }
}
