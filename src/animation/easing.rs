use serde::Deserialize;

/// Easing curves available to snap animations.
///
/// Every curve maps `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^3`
    #[default]
    CubicOut,
    /// `1 - (1 - t)^5`
    QuinticOut,
    /// Hermite smoothstep, `t^2 (3 - 2t)`
    SmoothStep,
}

impl Easing {
    /// Apply the curve to a linear fraction. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::QuinticOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv * inv * inv
            }
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::CubicOut,
        Easing::QuinticOut,
        Easing::SmoothStep,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn cubic_out_matches_closed_form() {
        let t = 0.25_f32;
        let expected = 1.0 - (1.0 - t).powi(3);
        assert!((Easing::CubicOut.apply(t) - expected).abs() < 1e-6);
        // ease-out front-loads motion
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.5), 1.0);
            assert_eq!(easing.apply(f32::NAN), 0.0);
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn deserializes_kebab_case_names() {
        #[derive(Deserialize)]
        struct Wrap {
            easing: Easing,
        }
        let w: Wrap = toml::from_str(r#"easing = "quintic-out""#).unwrap();
        assert_eq!(w.easing, Easing::QuinticOut);
    }
}
